//! Comment repository contracts and SQLite implementation.
//!
//! Comments reference `content_items(id)` with `ON DELETE CASCADE`, so
//! deleting an item removes its comments inside the same storage statement.

use crate::model::comment::Comment;
use crate::repo::{ensure_tables, row_count, RepoResult, UidProbe};
use rusqlite::{params, Connection};

pub trait CommentRepository: UidProbe {
    fn insert_comment(&self, comment: &Comment) -> RepoResult<()>;
    /// Oldest first.
    fn list_for_item(&self, item_id: &str) -> RepoResult<Vec<Comment>>;
    fn count_for_item(&self, item_id: &str) -> RepoResult<u64>;
}

/// SQLite-backed comment repository.
#[derive(Clone, Copy)]
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["comments"])?;
        Ok(Self { conn })
    }
}

impl UidProbe for SqliteCommentRepository<'_> {
    fn uid_exists(&self, uid: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM comments WHERE id = ?1);",
            [uid],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn insert_comment(&self, comment: &Comment) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO comments (id, item_id, name, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                comment.id.as_str(),
                comment.item_id.as_str(),
                comment.name.as_str(),
                comment.body.as_str(),
                comment.created_at,
            ],
        )?;
        Ok(())
    }

    fn list_for_item(&self, item_id: &str) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, item_id, name, body, created_at
             FROM comments
             WHERE item_id = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([item_id])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(Comment {
                id: row.get("id")?,
                item_id: row.get("item_id")?,
                name: row.get("name")?,
                body: row.get("body")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(comments)
    }

    fn count_for_item(&self, item_id: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE item_id = ?1;",
            [item_id],
            |row| row.get(0),
        )?;
        row_count(count)
    }
}
