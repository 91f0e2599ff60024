//! Content item lifecycle state machine.
//!
//! # Responsibility
//! - Drive `Active`/`Archived` transitions and the `featured` flag.
//! - Keep the tag ledger in step with each transition.
//!
//! # Invariants
//! - create -> `Active`; archive: `Active -> Archived`; restore:
//!   `Archived -> Active`; update and set_featured require `Active`.
//! - The item write is authoritative and always happens before the ledger
//!   step. When the ledger step fails the error is returned, the item change
//!   stays, and the ledger lags until repaired.
//! - State flips are conditional on the expected current state, so a second
//!   concurrent archive of the same item cannot decrement twice.
//! - Delete is allowed from either state and never touches the ledger.
//!   Deleting an `Active` item therefore leaks its tag contribution.
//!
//! # Consistency window
//! Between reading an item and flipping or editing it, a concurrent update
//! may change its tags; the ledger then applies deltas for the tags that were
//! read. Single-author editing keeps this window narrow.

use crate::model::item::{ContentItem, ContentKind, ItemDraft, ItemId, ItemState};
use crate::model::validation::validate_author;
use crate::repo::item_repo::{ItemListQuery, ItemRepository};
use crate::repo::tag_repo::TagAccountRepository;
use crate::repo::RepoResult;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::now_epoch_ms;
use crate::service::tag_ledger::TagLedger;
use crate::service::uid_generator::UidGenerator;
use log::{info, warn};

/// Lifecycle service over item storage and the tag ledger.
pub struct LifecycleService<I: ItemRepository, T: TagAccountRepository> {
    items: I,
    ledger: TagLedger<T>,
    uid: UidGenerator,
}

impl<I: ItemRepository, T: TagAccountRepository> LifecycleService<I, T> {
    pub fn new(items: I, tags: T) -> Self {
        Self {
            items,
            ledger: TagLedger::new(tags),
            uid: UidGenerator::new(),
        }
    }

    /// Replaces the id generator, e.g. with a seeded one.
    pub fn with_uid_generator(mut self, uid: UidGenerator) -> Self {
        self.uid = uid;
        self
    }

    pub fn ledger(&self) -> &TagLedger<T> {
        &self.ledger
    }

    /// Creates an `Active` item and counts its tags.
    pub fn create_item(
        &mut self,
        author: &str,
        kind: ContentKind,
        draft: ItemDraft,
    ) -> ServiceResult<ItemId> {
        validate_author(author)?;
        let draft = draft.normalized();
        draft.validate()?;

        let id = self.uid.generate(&self.items)?;
        let now = now_epoch_ms();
        let item = ContentItem {
            id: id.clone(),
            kind,
            author: author.to_string(),
            title: draft.title,
            subtitle: draft.subtitle,
            body: draft.body,
            cover_url: draft.cover_url,
            custom_slug: draft.custom_slug,
            tags: draft.tags,
            state: ItemState::Active,
            featured: false,
            created_at: now,
            last_updated: now,
            views: 0,
            reads: 0,
        };

        self.items.insert_item(&item)?;
        ledger_step("create", &item.id, self.ledger.on_create(author, &item.tags))?;

        info!(
            "event=item_create module=lifecycle status=ok kind={} item_id={} tag_count={}",
            kind.as_str(),
            item.id,
            item.tags.len()
        );
        Ok(id)
    }

    /// Replaces an `Active` item's editable fields and moves its tag counts.
    pub fn update_item(&self, id: &str, draft: ItemDraft) -> ServiceResult<()> {
        let draft = draft.normalized();
        draft.validate()?;
        let current = self.require_state(id, ItemState::Active, "update")?;

        if !self.items.replace_content(id, &draft, now_epoch_ms())? {
            return Err(self.conflict(id, "update"));
        }
        ledger_step(
            "update",
            id,
            self.ledger
                .on_update(&current.author, &current.tags, &draft.tags),
        )?;

        info!("event=item_update module=lifecycle status=ok item_id={id}");
        Ok(())
    }

    /// `Active -> Archived`; removes the item's tag contribution.
    pub fn archive_item(&self, id: &str) -> ServiceResult<()> {
        let current = self.require_state(id, ItemState::Active, "archive")?;

        if !self
            .items
            .transition_state(id, ItemState::Active, ItemState::Archived)?
        {
            return Err(self.conflict(id, "archive"));
        }
        ledger_step(
            "archive",
            id,
            self.ledger.on_archive(&current.author, &current.tags),
        )?;

        info!("event=item_archive module=lifecycle status=ok item_id={id}");
        Ok(())
    }

    /// `Archived -> Active`; restores the item's tag contribution.
    pub fn restore_item(&self, id: &str) -> ServiceResult<()> {
        let current = self.require_state(id, ItemState::Archived, "restore")?;

        if !self
            .items
            .transition_state(id, ItemState::Archived, ItemState::Active)?
        {
            return Err(self.conflict(id, "restore"));
        }
        ledger_step(
            "restore",
            id,
            self.ledger.on_restore(&current.author, &current.tags),
        )?;

        info!("event=item_restore module=lifecycle status=ok item_id={id}");
        Ok(())
    }

    /// Permanently removes an item and, through storage, its comments.
    pub fn delete_item(&self, id: &str) -> ServiceResult<()> {
        let current = self.get_item(id)?;
        self.items.delete_item(id)?;
        self.ledger.on_delete(&current.author, &current.tags);

        if current.is_active() {
            warn!(
                "event=item_delete module=lifecycle status=ok item_id={} ledger=leaked tag_count={}",
                id,
                current.tags.len()
            );
        } else {
            info!("event=item_delete module=lifecycle status=ok item_id={id}");
        }
        Ok(())
    }

    /// Sets the featured flag of an `Active` item.
    pub fn set_featured(&self, id: &str, featured: bool) -> ServiceResult<()> {
        self.require_state(id, ItemState::Active, "feature")?;
        if !self.items.set_featured(id, featured)? {
            return Err(self.conflict(id, "feature"));
        }
        info!("event=item_feature module=lifecycle status=ok item_id={id} featured={featured}");
        Ok(())
    }

    pub fn get_item(&self, id: &str) -> ServiceResult<ContentItem> {
        self.items
            .get_item(id)?
            .ok_or_else(|| ServiceError::ItemNotFound(id.to_string()))
    }

    /// Archived items of one kind, newest first.
    pub fn list_archived(
        &self,
        author: &str,
        kind: ContentKind,
    ) -> ServiceResult<Vec<ContentItem>> {
        let query = ItemListQuery {
            kind: Some(kind),
            state: Some(ItemState::Archived),
            ..ItemListQuery::for_author(author)
        };
        Ok(self.items.list_items(&query)?)
    }

    /// Featured items of one kind that are currently `Active`, newest first.
    ///
    /// Archived items keep their flag but never show up here.
    pub fn list_featured(
        &self,
        author: &str,
        kind: ContentKind,
    ) -> ServiceResult<Vec<ContentItem>> {
        let query = ItemListQuery {
            kind: Some(kind),
            state: Some(ItemState::Active),
            featured_only: true,
            ..ItemListQuery::for_author(author)
        };
        Ok(self.items.list_items(&query)?)
    }

    fn require_state(
        &self,
        id: &str,
        expected: ItemState,
        action: &'static str,
    ) -> ServiceResult<ContentItem> {
        let item = self.get_item(id)?;
        if item.state != expected {
            return Err(ServiceError::InvalidState {
                item_id: id.to_string(),
                state: item.state,
                action,
            });
        }
        Ok(item)
    }

    /// Classifies a conditional write that matched no row.
    fn conflict(&self, id: &str, action: &'static str) -> ServiceError {
        match self.items.get_item(id) {
            Ok(Some(item)) => ServiceError::InvalidState {
                item_id: id.to_string(),
                state: item.state,
                action,
            },
            Ok(None) => ServiceError::ItemNotFound(id.to_string()),
            Err(err) => err.into(),
        }
    }
}

fn ledger_step(action: &'static str, item_id: &str, result: RepoResult<()>) -> ServiceResult<()> {
    result.map_err(|err| {
        warn!(
            "event=item_{action} module=lifecycle status=partial item_id={item_id} applied_step=item failed_step=ledger error={err}"
        );
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::LifecycleService;
    use crate::db::open_db_in_memory;
    use crate::model::item::{ContentKind, ItemDraft, ItemState};
    use crate::repo::item_repo::SqliteItemRepository;
    use crate::repo::tag_repo::{SqliteTagAccountRepository, TagAccountRepository, TagDelta};
    use crate::repo::{RepoError, RepoResult};
    use crate::service::error::ServiceError;
    use std::cell::Cell;

    /// SQLite tag accounts that reject writes while `failing` is set.
    struct FlakyAccounts<'conn> {
        inner: SqliteTagAccountRepository<'conn>,
        failing: Cell<bool>,
    }

    impl TagAccountRepository for &FlakyAccounts<'_> {
        fn apply_deltas(&self, author: &str, deltas: &[TagDelta]) -> RepoResult<()> {
            if self.failing.get() {
                return Err(RepoError::InvalidData("tag store offline".to_string()));
            }
            self.inner.apply_deltas(author, deltas)
        }

        fn list_counts(&self, author: &str) -> RepoResult<Vec<(String, i64)>> {
            self.inner.list_counts(author)
        }

        fn clear_author(&self, author: &str) -> RepoResult<u64> {
            self.inner.clear_author(author)
        }
    }

    fn sorted_counts(accounts: &FlakyAccounts<'_>, author: &str) -> Vec<(String, i64)> {
        let mut counts = accounts.list_counts(author).unwrap();
        counts.sort();
        counts
    }

    #[test]
    fn ledger_failure_keeps_the_item_write_and_leaves_counts_behind() {
        let conn = open_db_in_memory().unwrap();
        let accounts = FlakyAccounts {
            inner: SqliteTagAccountRepository::try_new(&conn).unwrap(),
            failing: Cell::new(false),
        };
        let mut service =
            LifecycleService::new(SqliteItemRepository::try_new(&conn).unwrap(), &accounts);

        let archived = service
            .create_item("ann", ContentKind::Post, ItemDraft::new("One", "rust"))
            .unwrap();
        let edited = service
            .create_item("ann", ContentKind::Post, ItemDraft::new("Two", "go"))
            .unwrap();
        let before = sorted_counts(&accounts, "ann");
        assert_eq!(before, vec![("go".to_string(), 1), ("rust".to_string(), 1)]);

        accounts.failing.set(true);

        let err = service.archive_item(&archived).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::InvalidData(_))));
        assert_eq!(service.get_item(&archived).unwrap().state, ItemState::Archived);

        let err = service
            .update_item(&edited, ItemDraft::new("Two v2", "zig"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Repo(_)));
        let item = service.get_item(&edited).unwrap();
        assert_eq!(item.title, "Two v2");
        assert_eq!(item.tags, vec!["zig".to_string()]);

        assert_eq!(sorted_counts(&accounts, "ann"), before);
    }
}
