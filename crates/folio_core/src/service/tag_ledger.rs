//! Per-author tag usage ledger.
//!
//! # Responsibility
//! - Translate lifecycle transitions into signed tag-count deltas.
//! - Serve the "tags in use" listing for an author.
//!
//! # Invariants
//! - Each hook is applied at most once per transition; the caller owns that.
//! - `on_update` is two independent atomic steps: decrement old tags, then
//!   increment new tags. If the second step fails the account reflects only
//!   the decrement until something re-applies the increment.
//! - `on_delete` changes nothing. An item deleted while still `Active` keeps
//!   contributing to its tags' counts.
//! - `list_active` never returns a count <= 0.

use crate::repo::tag_repo::{TagAccountRepository, TagDelta};
use crate::repo::RepoResult;
use log::{debug, warn};
use serde::Serialize;

/// One listed tag and its usage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

impl TagCount {
    pub fn new(tag: impl Into<String>, count: i64) -> Self {
        Self {
            tag: tag.into(),
            count,
        }
    }
}

/// Ledger facade over a tag account repository.
pub struct TagLedger<T: TagAccountRepository> {
    repo: T,
}

impl<T: TagAccountRepository> TagLedger<T> {
    pub fn new(repo: T) -> Self {
        Self { repo }
    }

    /// A new `Active` item contributes +1 to each of its tags.
    pub fn on_create(&self, author: &str, tags: &[String]) -> RepoResult<()> {
        self.apply(author, tags, 1)
    }

    /// Moves an edited item's contribution from `old_tags` to `new_tags`.
    pub fn on_update(
        &self,
        author: &str,
        old_tags: &[String],
        new_tags: &[String],
    ) -> RepoResult<()> {
        self.apply(author, old_tags, -1)?;
        if let Err(err) = self.apply(author, new_tags, 1) {
            warn!(
                "event=ledger_update module=tag_ledger status=partial applied_step=decrement failed_step=increment author={} error={}",
                author, err
            );
            return Err(err);
        }
        Ok(())
    }

    /// Removes an archived item's contribution; its own tag set is untouched.
    pub fn on_archive(&self, author: &str, tags: &[String]) -> RepoResult<()> {
        self.apply(author, tags, -1)
    }

    /// Exact inverse of [`TagLedger::on_archive`].
    pub fn on_restore(&self, author: &str, tags: &[String]) -> RepoResult<()> {
        self.apply(author, tags, 1)
    }

    /// No-op; see module invariants.
    pub fn on_delete(&self, author: &str, tags: &[String]) {
        debug!(
            "event=ledger_delete module=tag_ledger status=skipped author={} tag_count={}",
            author,
            tags.len()
        );
    }

    /// Drops the author's whole account, used when the author is removed.
    pub fn clear(&self, author: &str) -> RepoResult<u64> {
        self.repo.clear_author(author)
    }

    /// Tags with a positive count, most used first, ties alphabetical.
    pub fn list_active(&self, author: &str) -> RepoResult<Vec<TagCount>> {
        let mut counts: Vec<TagCount> = self
            .repo
            .list_counts(author)?
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(counts)
    }

    fn apply(&self, author: &str, tags: &[String], delta: i64) -> RepoResult<()> {
        let deltas: Vec<TagDelta> = tags
            .iter()
            .map(|tag| TagDelta::new(tag.as_str(), delta))
            .collect();
        self.repo.apply_deltas(author, &deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::{TagCount, TagLedger};
    use crate::repo::tag_repo::{TagAccountRepository, TagDelta};
    use crate::repo::{RepoError, RepoResult};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// In-memory account store that can be told to fail its next N calls.
    #[derive(Default)]
    struct MemoryAccounts {
        counts: RefCell<HashMap<(String, String), i64>>,
        fail_after: Cell<Option<usize>>,
    }

    impl MemoryAccounts {
        fn count(&self, author: &str, tag: &str) -> Option<i64> {
            self.counts
                .borrow()
                .get(&(author.to_string(), tag.to_string()))
                .copied()
        }
    }

    impl TagAccountRepository for &MemoryAccounts {
        fn apply_deltas(&self, author: &str, deltas: &[TagDelta]) -> RepoResult<()> {
            if let Some(remaining) = self.fail_after.get() {
                if remaining == 0 {
                    return Err(RepoError::InvalidData("storage unavailable".to_string()));
                }
                self.fail_after.set(Some(remaining - 1));
            }
            let mut counts = self.counts.borrow_mut();
            for delta in deltas {
                *counts
                    .entry((author.to_string(), delta.tag.clone()))
                    .or_insert(0) += delta.delta;
            }
            Ok(())
        }

        fn list_counts(&self, author: &str) -> RepoResult<Vec<(String, i64)>> {
            Ok(self
                .counts
                .borrow()
                .iter()
                .filter(|((owner, _), _)| owner == author)
                .map(|((_, tag), count)| (tag.clone(), *count))
                .collect())
        }

        fn clear_author(&self, author: &str) -> RepoResult<u64> {
            let mut counts = self.counts.borrow_mut();
            let before = counts.len();
            counts.retain(|(owner, _), _| owner != author);
            Ok((before - counts.len()) as u64)
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn list_active_orders_by_count_then_name_and_drops_non_positive() {
        let store = MemoryAccounts::default();
        let ledger = TagLedger::new(&store);
        ledger.on_create("ann", &tags(&["zig", "rust", "go"])).unwrap();
        ledger.on_create("ann", &tags(&["rust", "go", "c"])).unwrap();
        ledger.on_archive("ann", &tags(&["c"])).unwrap();
        ledger.on_archive("ann", &tags(&["old"])).unwrap();

        assert_eq!(
            ledger.list_active("ann").unwrap(),
            vec![
                TagCount::new("go", 2),
                TagCount::new("rust", 2),
                TagCount::new("zig", 1),
            ]
        );
        assert_eq!(store.count("ann", "c"), Some(0));
        assert_eq!(store.count("ann", "old"), Some(-1));
    }

    #[test]
    fn accounts_are_isolated_per_author() {
        let store = MemoryAccounts::default();
        let ledger = TagLedger::new(&store);
        ledger.on_create("ann", &tags(&["rust"])).unwrap();
        ledger.on_create("bob", &tags(&["rust", "go"])).unwrap();

        assert_eq!(ledger.list_active("ann").unwrap(), vec![TagCount::new("rust", 1)]);
        assert_eq!(ledger.list_active("bob").unwrap().len(), 2);
    }

    #[test]
    fn update_failure_after_decrement_leaves_only_the_decrement() {
        let store = MemoryAccounts::default();
        let ledger = TagLedger::new(&store);
        ledger.on_create("ann", &tags(&["draft"])).unwrap();

        store.fail_after.set(Some(1));
        let err = ledger
            .on_update("ann", &tags(&["draft"]), &tags(&["final"]))
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
        assert_eq!(store.count("ann", "draft"), Some(0));
        assert_eq!(store.count("ann", "final"), None);
    }

    #[test]
    fn clear_drops_only_the_given_author() {
        let store = MemoryAccounts::default();
        let ledger = TagLedger::new(&store);
        ledger.on_create("ann", &tags(&["rust", "go"])).unwrap();
        ledger.on_create("bob", &tags(&["rust"])).unwrap();

        assert_eq!(ledger.clear("ann").unwrap(), 2);
        assert!(ledger.list_active("ann").unwrap().is_empty());
        assert_eq!(store.count("bob", "rust"), Some(1));
    }

    #[test]
    fn delete_hook_does_not_touch_counts() {
        let store = MemoryAccounts::default();
        let ledger = TagLedger::new(&store);
        ledger.on_create("ann", &tags(&["rust"])).unwrap();
        ledger.on_delete("ann", &tags(&["rust"]));
        assert_eq!(store.count("ann", "rust"), Some(1));
    }
}
