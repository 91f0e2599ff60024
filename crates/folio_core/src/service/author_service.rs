//! Author accounts as seen by the content core.
//!
//! # Responsibility
//! - Register authors and answer "does this author exist" for every
//!   author-scoped listing.
//! - Remove an author together with everything they own.
//!
//! # Invariants
//! - Removal runs items first, then the tag account, then the author row.
//!   A failed step leaves the author in place, so the removal can simply be
//!   run again; earlier steps are no-ops the second time.
//! - Comments go with their items through the storage cascade.

use crate::model::author::Author;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::item_repo::ItemRepository;
use crate::repo::tag_repo::TagAccountRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::now_epoch_ms;
use crate::service::tag_ledger::TagLedger;
use log::{info, warn};

pub struct AuthorService<A: AuthorRepository, I: ItemRepository, T: TagAccountRepository> {
    authors: A,
    items: I,
    ledger: TagLedger<T>,
}

impl<A: AuthorRepository, I: ItemRepository, T: TagAccountRepository> AuthorService<A, I, T> {
    pub fn new(authors: A, items: I, tags: T) -> Self {
        Self {
            authors,
            items,
            ledger: TagLedger::new(tags),
        }
    }

    pub fn register_author(&self, username: &str, blogname: &str) -> ServiceResult<Author> {
        let author = Author::new(username, blogname, now_epoch_ms())?;
        if self.authors.author_exists(username)? {
            return Err(ServiceError::AuthorExists(username.to_string()));
        }
        self.authors.insert_author(&author)?;

        info!("event=author_register module=authors status=ok author={username}");
        Ok(author)
    }

    pub fn get_author(&self, username: &str) -> ServiceResult<Author> {
        self.authors
            .get_author(username)?
            .ok_or_else(|| ServiceError::AuthorNotFound(username.to_string()))
    }

    /// Fails with `AuthorNotFound` unless the account exists.
    pub fn require_author(&self, username: &str) -> ServiceResult<()> {
        if self.authors.author_exists(username)? {
            Ok(())
        } else {
            Err(ServiceError::AuthorNotFound(username.to_string()))
        }
    }

    /// Deletes every item of the author (with their comments), the author's
    /// tag account and finally the author row.
    pub fn remove_author(&self, username: &str) -> ServiceResult<()> {
        self.require_author(username)?;

        let items_removed = self.items.delete_for_author(username)?;
        removal_step("tag_account", username, self.ledger.clear(username))?;
        removal_step("author", username, self.authors.delete_author(username))?;

        info!(
            "event=author_remove module=authors status=ok author={username} items_removed={items_removed}"
        );
        Ok(())
    }
}

fn author_error(username: &str, err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound(_) => ServiceError::AuthorNotFound(username.to_string()),
        other => other.into(),
    }
}

fn removal_step<V>(step: &'static str, username: &str, result: RepoResult<V>) -> ServiceResult<V> {
    result.map_err(|err| {
        warn!(
            "event=author_remove module=authors status=partial author={username} failed_step={step} error={err}"
        );
        author_error(username, err)
    })
}
