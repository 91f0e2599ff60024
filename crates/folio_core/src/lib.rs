//! Content lifecycle core for a multi-author blogging and portfolio platform.
//!
//! This crate owns the invariants that survive across requests: unique item
//! ids, author accounts, the per-author tag ledger, the Active/Archived state
//! machine and page legality. Routing, rendering and auth live elsewhere and call in
//! through [`ContentService`].

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::author::Author;
pub use model::comment::{Comment, CommentDraft, CommentId};
pub use model::item::{ContentItem, ContentKind, CounterField, ItemDraft, ItemId, ItemState};
pub use model::tags::parse_tags_csv;
pub use model::validation::{validate_author, ValidationError};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::item_repo::{ItemListQuery, ItemRepository, SqliteItemRepository};
pub use repo::tag_repo::{SqliteTagAccountRepository, TagAccountRepository, TagDelta};
pub use repo::{RepoError, RepoResult, UidProbe};
pub use service::author_service::AuthorService;
pub use service::comment_service::CommentService;
pub use service::content_service::{ContentService, SqliteContentService};
pub use service::counters::Counters;
pub use service::error::{ServiceError, ServiceResult};
pub use service::lifecycle::LifecycleService;
pub use service::paginator::{compute_window, PaginationContext, Paginator};
pub use service::tag_ledger::{TagCount, TagLedger};
pub use service::uid_generator::{UidGenerator, UID_LEN};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
