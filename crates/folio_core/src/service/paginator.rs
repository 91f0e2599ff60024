//! Offset pagination over an author's active items of one kind.
//!
//! # Invariants
//! - `max_page = max(1, ceil(total / page_size))`, so an empty listing still
//!   has a legal page 1.
//! - Pages are windows of `created_at DESC, id ASC`, a total order, so
//!   consecutive pages over unchanged data never skip or repeat an item.
//! - Offset based, not keyset: cost grows with the page number.

use crate::model::item::{ContentItem, ContentKind, ItemState};
use crate::model::validation::ValidationError;
use crate::repo::item_repo::{ItemListQuery, ItemRepository};
use crate::service::error::{ServiceError, ServiceResult};
use serde::Serialize;

/// Legal page window plus navigation affordances for one listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationContext {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub max_page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationContext {
    /// Rows to skip when fetching this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// Computes the page window for `total` active items.
///
/// Fails with `PageNotFound` when `page` falls outside `1..=max_page`.
pub fn compute_window(total: u64, page: u32, page_size: u32) -> ServiceResult<PaginationContext> {
    if page_size == 0 {
        return Err(ValidationError::ZeroPageSize.into());
    }

    let size = u64::from(page_size);
    let pages = total.div_ceil(size).max(1);
    let max_page = u32::try_from(pages).unwrap_or(u32::MAX);

    if page < 1 || page > max_page {
        return Err(ServiceError::PageNotFound { page, max_page });
    }

    Ok(PaginationContext {
        page,
        page_size,
        total,
        max_page,
        has_next: u64::from(page) * size < total,
        has_prev: page > 1,
    })
}

/// Pagination service over an item repository.
pub struct Paginator<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> Paginator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Counts the author's active items of `kind` and validates `page`.
    pub fn setup(
        &self,
        author: &str,
        kind: ContentKind,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<PaginationContext> {
        let total = self.repo.count_active(author, kind)?;
        compute_window(total, page, page_size)
    }

    /// Fetches the items of an already validated window.
    pub fn fetch_page(
        &self,
        author: &str,
        kind: ContentKind,
        context: &PaginationContext,
    ) -> ServiceResult<Vec<ContentItem>> {
        let query = ItemListQuery {
            author: author.to_string(),
            kind: Some(kind),
            state: Some(ItemState::Active),
            featured_only: false,
            limit: Some(context.limit()),
            offset: context.offset(),
        };
        Ok(self.repo.list_items(&query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_window, PaginationContext};
    use crate::service::error::ServiceError;

    #[test]
    fn empty_listing_has_a_single_legal_page() {
        let ctx = compute_window(0, 1, 20).unwrap();
        assert_eq!(ctx.max_page, 1);
        assert!(!ctx.has_next);
        assert!(!ctx.has_prev);
        assert_eq!(ctx.offset(), 0);
    }

    #[test]
    fn forty_five_items_in_pages_of_twenty() {
        let first = compute_window(45, 1, 20).unwrap();
        assert_eq!(first.max_page, 3);
        assert!(first.has_next);
        assert!(!first.has_prev);

        let middle = compute_window(45, 2, 20).unwrap();
        assert!(middle.has_next);
        assert!(middle.has_prev);
        assert_eq!(middle.offset(), 20);

        let last = compute_window(45, 3, 20).unwrap();
        assert!(!last.has_next);
        assert!(last.has_prev);

        let err = compute_window(45, 4, 20).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::PageNotFound {
                page: 4,
                max_page: 3
            }
        ));
    }

    #[test]
    fn page_zero_and_zero_page_size_are_rejected() {
        assert!(compute_window(10, 0, 5).unwrap_err().is_not_found());
        assert!(matches!(
            compute_window(10, 1, 0),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn hand_built_context_with_page_zero_has_offset_zero() {
        let context = PaginationContext {
            page: 0,
            page_size: 20,
            total: 0,
            max_page: 1,
            has_next: false,
            has_prev: false,
        };
        assert_eq!(context.offset(), 0);
    }

    #[test]
    fn exact_multiple_has_no_next_page_on_the_last_page() {
        let last = compute_window(40, 2, 20).unwrap();
        assert_eq!(last.max_page, 2);
        assert!(!last.has_next);
    }
}
