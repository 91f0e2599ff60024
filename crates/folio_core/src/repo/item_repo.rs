//! Content item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide atomic single-row operations over `content_items`.
//! - Keep the listing order (`created_at DESC, id ASC`) in one place so that
//!   counting and offsetting always agree.
//!
//! # Invariants
//! - State flips and featured updates are conditional on the current state,
//!   so a caller can tell "already in that state" apart from "applied".
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::item::{ContentItem, ContentKind, CounterField, ItemDraft, ItemState};
use crate::repo::{ensure_tables, row_count, RepoError, RepoResult, UidProbe};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    kind,
    author,
    title,
    subtitle,
    body,
    cover_url,
    custom_slug,
    tags_json,
    state,
    featured,
    created_at,
    last_updated,
    views,
    reads
FROM content_items";

/// Filter, order and window options for listing items of one author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListQuery {
    pub author: String,
    pub kind: Option<ContentKind>,
    pub state: Option<ItemState>,
    pub featured_only: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ItemListQuery {
    pub fn for_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }
}

/// Repository interface for content items.
pub trait ItemRepository: UidProbe {
    fn insert_item(&self, item: &ContentItem) -> RepoResult<()>;
    fn get_item(&self, id: &str) -> RepoResult<Option<ContentItem>>;
    /// Replaces editable fields of an `Active` item. Returns `false` when no
    /// active row matched.
    fn replace_content(&self, id: &str, draft: &ItemDraft, updated_at: i64) -> RepoResult<bool>;
    /// Moves an item from `from` to `to`. Returns `false` when the row was
    /// missing or not in `from`.
    fn transition_state(&self, id: &str, from: ItemState, to: ItemState) -> RepoResult<bool>;
    /// Sets `featured` on an `Active` item. Returns `false` when no active row
    /// matched.
    fn set_featured(&self, id: &str, featured: bool) -> RepoResult<bool>;
    fn delete_item(&self, id: &str) -> RepoResult<()>;
    /// Removes every item of `author` in one statement; returns how many.
    fn delete_for_author(&self, author: &str) -> RepoResult<u64>;
    fn count_active(&self, author: &str, kind: ContentKind) -> RepoResult<u64>;
    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<ContentItem>>;
    /// Adds one to `field` and returns the item's author.
    fn increment_counter(&self, id: &str, field: CounterField) -> RepoResult<String>;
}

/// SQLite-backed item repository.
#[derive(Clone, Copy)]
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["content_items"])?;
        Ok(Self { conn })
    }
}

impl UidProbe for SqliteItemRepository<'_> {
    fn uid_exists(&self, uid: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM content_items WHERE id = ?1);",
            [uid],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &ContentItem) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO content_items (
                id,
                kind,
                author,
                title,
                subtitle,
                body,
                cover_url,
                custom_slug,
                tags_json,
                state,
                featured,
                created_at,
                last_updated,
                views,
                reads
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                item.id.as_str(),
                item.kind.as_str(),
                item.author.as_str(),
                item.title.as_str(),
                item.subtitle.as_str(),
                item.body.as_str(),
                item.cover_url.as_deref(),
                item.custom_slug.as_deref(),
                tags_to_json(&item.tags)?,
                item.state.as_str(),
                bool_to_int(item.featured),
                item.created_at,
                item.last_updated,
                item.views,
                item.reads,
            ],
        )?;
        Ok(())
    }

    fn get_item(&self, id: &str) -> RepoResult<Option<ContentItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }
        Ok(None)
    }

    fn replace_content(&self, id: &str, draft: &ItemDraft, updated_at: i64) -> RepoResult<bool> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE content_items
             SET
                title = ?2,
                subtitle = ?3,
                body = ?4,
                cover_url = ?5,
                custom_slug = ?6,
                tags_json = ?7,
                last_updated = ?8
             WHERE id = ?1
               AND state = 'active';",
            params![
                id,
                draft.title.as_str(),
                draft.subtitle.as_str(),
                draft.body.as_str(),
                draft.cover_url.as_deref(),
                draft.custom_slug.as_deref(),
                tags_to_json(&draft.tags)?,
                updated_at,
            ],
        )?;
        Ok(changed > 0)
    }

    fn transition_state(&self, id: &str, from: ItemState, to: ItemState) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE content_items SET state = ?3 WHERE id = ?1 AND state = ?2;",
            params![id, from.as_str(), to.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn set_featured(&self, id: &str, featured: bool) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE content_items SET featured = ?2 WHERE id = ?1 AND state = 'active';",
            params![id, bool_to_int(featured)],
        )?;
        Ok(changed > 0)
    }

    fn delete_item(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM content_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_for_author(&self, author: &str) -> RepoResult<u64> {
        let removed = self
            .conn
            .execute("DELETE FROM content_items WHERE author = ?1;", [author])?;
        Ok(removed as u64)
    }

    fn count_active(&self, author: &str, kind: ContentKind) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM content_items
             WHERE author = ?1
               AND kind = ?2
               AND state = 'active';",
            params![author, kind.as_str()],
            |row| row.get(0),
        )?;
        row_count(count)
    }

    fn list_items(&self, query: &ItemListQuery) -> RepoResult<Vec<ContentItem>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE author = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.author.clone())];

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        if let Some(state) = query.state {
            sql.push_str(" AND state = ?");
            bind_values.push(Value::Text(state.as_str().to_string()));
        }

        if query.featured_only {
            sql.push_str(" AND featured = 1");
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn increment_counter(&self, id: &str, field: CounterField) -> RepoResult<String> {
        let column = field.column();
        self.conn
            .query_row(
                &format!(
                    "UPDATE content_items
                     SET {column} = {column} + 1
                     WHERE id = ?1
                     RETURNING author;"
                ),
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ContentItem> {
    let id: String = row.get("id")?;

    let kind_text: String = row.get("kind")?;
    let kind = ContentKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` for item `{id}`"))
    })?;

    let state_text: String = row.get("state")?;
    let state = ItemState::parse(&state_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid state `{state_text}` for item `{id}`"))
    })?;

    let featured = match row.get::<_, i64>("featured")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid featured value `{other}` for item `{id}`"
            )));
        }
    };

    let tags_json: String = row.get("tags_json")?;
    let tags = serde_json::from_str::<Vec<String>>(&tags_json).map_err(|err| {
        RepoError::InvalidData(format!("invalid tags_json for item `{id}`: {err}"))
    })?;

    Ok(ContentItem {
        kind,
        author: row.get("author")?,
        title: row.get("title")?,
        subtitle: row.get("subtitle")?,
        body: row.get("body")?,
        cover_url: row.get("cover_url")?,
        custom_slug: row.get("custom_slug")?,
        tags,
        state,
        featured,
        created_at: row.get("created_at")?,
        last_updated: row.get("last_updated")?,
        views: row.get("views")?,
        reads: row.get("reads")?,
        id,
    })
}

fn tags_to_json(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("unserializable tag set: {err}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
