//! Author account storage.
//!
//! # Invariants
//! - `total_views` only moves through [`AuthorRepository::add_view`], a single
//!   `+1` statement.
//! - Deleting an author row touches nothing else; clearing the author's
//!   items and tag account is the caller's job.

use crate::model::author::Author;
use crate::repo::{ensure_tables, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait AuthorRepository {
    fn insert_author(&self, author: &Author) -> RepoResult<()>;
    fn get_author(&self, username: &str) -> RepoResult<Option<Author>>;
    fn author_exists(&self, username: &str) -> RepoResult<bool>;
    /// Adds one view to the author's running total.
    fn add_view(&self, username: &str) -> RepoResult<()>;
    fn delete_author(&self, username: &str) -> RepoResult<()>;
}

#[derive(Clone, Copy)]
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["authors"])?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn insert_author(&self, author: &Author) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO authors (username, blogname, total_views, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                author.username.as_str(),
                author.blogname.as_str(),
                author.total_views,
                author.created_at,
            ],
        )?;
        Ok(())
    }

    fn get_author(&self, username: &str) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                "SELECT username, blogname, total_views, created_at
                 FROM authors
                 WHERE username = ?1;",
                [username],
                |row| {
                    Ok(Author {
                        username: row.get("username")?,
                        blogname: row.get("blogname")?,
                        total_views: row.get("total_views")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(author)
    }

    fn author_exists(&self, username: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE username = ?1);",
            [username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn add_view(&self, username: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE authors SET total_views = total_views + 1 WHERE username = ?1;",
            [username],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(username.to_string()));
        }
        Ok(())
    }

    fn delete_author(&self, username: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE username = ?1;", [username])?;
        if changed == 0 {
            return Err(RepoError::NotFound(username.to_string()));
        }
        Ok(())
    }
}
