//! View/read counters.
//!
//! Each call is one atomic `+1`. Repeated calls (refreshes) simply add up;
//! the numbers are informational and nothing deduplicates them.
//!
//! A view also bumps the author's `total_views`. The item counter is
//! written first; when the author step fails the item keeps its view and
//! the author total lags by one.

use crate::model::item::CounterField;
use crate::repo::author_repo::AuthorRepository;
use crate::repo::item_repo::ItemRepository;
use crate::repo::RepoError;
use crate::service::error::{ServiceError, ServiceResult};
use log::warn;

pub struct Counters<R: ItemRepository, A: AuthorRepository> {
    repo: R,
    authors: A,
}

impl<R: ItemRepository, A: AuthorRepository> Counters<R, A> {
    pub fn new(repo: R, authors: A) -> Self {
        Self { repo, authors }
    }

    /// Bumps one item counter and returns the item's author.
    pub fn increment(&self, item_id: &str, field: CounterField) -> ServiceResult<String> {
        Ok(self.repo.increment_counter(item_id, field)?)
    }

    pub fn increment_view(&self, item_id: &str) -> ServiceResult<()> {
        let author = self.increment(item_id, CounterField::Views)?;
        self.authors.add_view(&author).map_err(|err| {
            warn!(
                "event=view_increment module=counters status=partial item_id={item_id} applied_step=item failed_step=author error={err}"
            );
            match err {
                RepoError::NotFound(_) => ServiceError::AuthorNotFound(author.clone()),
                other => other.into(),
            }
        })
    }

    pub fn increment_read(&self, item_id: &str) -> ServiceResult<()> {
        self.increment(item_id, CounterField::Reads)?;
        Ok(())
    }
}
