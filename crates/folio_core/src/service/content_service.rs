//! Core-facing facade used by the HTTP layer.
//!
//! # Responsibility
//! - Expose every content operation behind one handle built from injected
//!   repositories.
//! - Keep lifecycle, pagination and counters sharing the same storage.
//!
//! # Invariants
//! - Author-scoped operations (create, listings, tag listing) fail with
//!   `AuthorNotFound` for an unregistered username before touching items.

use crate::model::author::Author;
use crate::model::item::{ContentItem, ContentKind, ItemDraft, ItemId};
use crate::model::tags::parse_tags_csv;
use crate::repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::tag_repo::{SqliteTagAccountRepository, TagAccountRepository};
use crate::repo::RepoResult;
use crate::service::author_service::AuthorService;
use crate::service::counters::Counters;
use crate::service::error::ServiceResult;
use crate::service::lifecycle::LifecycleService;
use crate::service::paginator::{PaginationContext, Paginator};
use crate::service::tag_ledger::TagCount;
use crate::service::uid_generator::UidGenerator;
use rusqlite::Connection;

/// Content service wired to SQLite repositories on one connection.
pub type SqliteContentService<'conn> = ContentService<
    SqliteItemRepository<'conn>,
    SqliteTagAccountRepository<'conn>,
    SqliteAuthorRepository<'conn>,
>;

pub struct ContentService<I, T, A>
where
    I: ItemRepository + Clone,
    T: TagAccountRepository + Clone,
    A: AuthorRepository + Clone,
{
    authors: AuthorService<A, I, T>,
    lifecycle: LifecycleService<I, T>,
    paginator: Paginator<I>,
    counters: Counters<I, A>,
}

impl<'conn> SqliteContentService<'conn> {
    /// Builds the service over a migrated connection.
    pub fn open(conn: &'conn Connection) -> RepoResult<Self> {
        let items = SqliteItemRepository::try_new(conn)?;
        let tags = SqliteTagAccountRepository::try_new(conn)?;
        let authors = SqliteAuthorRepository::try_new(conn)?;
        Ok(Self::new(items, tags, authors))
    }
}

impl<I, T, A> ContentService<I, T, A>
where
    I: ItemRepository + Clone,
    T: TagAccountRepository + Clone,
    A: AuthorRepository + Clone,
{
    pub fn new(items: I, tags: T, authors: A) -> Self {
        Self {
            authors: AuthorService::new(authors.clone(), items.clone(), tags.clone()),
            paginator: Paginator::new(items.clone()),
            counters: Counters::new(items.clone(), authors),
            lifecycle: LifecycleService::new(items, tags),
        }
    }

    pub fn with_uid_generator(mut self, uid: UidGenerator) -> Self {
        self.lifecycle = self.lifecycle.with_uid_generator(uid);
        self
    }

    pub fn register_author(&self, username: &str, blogname: &str) -> ServiceResult<Author> {
        self.authors.register_author(username, blogname)
    }

    pub fn get_author(&self, username: &str) -> ServiceResult<Author> {
        self.authors.get_author(username)
    }

    /// Removes the author, all of their items and comments, and their tags.
    pub fn remove_author(&self, username: &str) -> ServiceResult<()> {
        self.authors.remove_author(username)
    }

    pub fn create_item(
        &mut self,
        author: &str,
        kind: ContentKind,
        draft: ItemDraft,
    ) -> ServiceResult<ItemId> {
        self.authors.require_author(author)?;
        self.lifecycle.create_item(author, kind, draft)
    }

    /// Form-shaped create: title plus raw comma-separated tags.
    pub fn create_from_form(
        &mut self,
        author: &str,
        kind: ContentKind,
        title: &str,
        tags_csv: &str,
    ) -> ServiceResult<ItemId> {
        self.create_item(author, kind, ItemDraft::new(title, tags_csv))
    }

    pub fn update_item(&self, id: &str, draft: ItemDraft) -> ServiceResult<()> {
        self.lifecycle.update_item(id, draft)
    }

    /// Form-shaped update that keeps the stored subtitle, body and links.
    pub fn update_from_form(&self, id: &str, title: &str, tags_csv: &str) -> ServiceResult<()> {
        let current = self.lifecycle.get_item(id)?;
        let draft = ItemDraft {
            title: title.to_string(),
            subtitle: current.subtitle,
            body: current.body,
            tags: parse_tags_csv(tags_csv),
            cover_url: current.cover_url,
            custom_slug: current.custom_slug,
        };
        self.lifecycle.update_item(id, draft)
    }

    pub fn archive_item(&self, id: &str) -> ServiceResult<()> {
        self.lifecycle.archive_item(id)
    }

    pub fn restore_item(&self, id: &str) -> ServiceResult<()> {
        self.lifecycle.restore_item(id)
    }

    pub fn delete_item(&self, id: &str) -> ServiceResult<()> {
        self.lifecycle.delete_item(id)
    }

    pub fn set_featured(&self, id: &str, featured: bool) -> ServiceResult<()> {
        self.lifecycle.set_featured(id, featured)
    }

    pub fn get_item(&self, id: &str) -> ServiceResult<ContentItem> {
        self.lifecycle.get_item(id)
    }

    pub fn paginate(
        &self,
        author: &str,
        kind: ContentKind,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<PaginationContext> {
        self.authors.require_author(author)?;
        self.paginator.setup(author, kind, page, page_size)
    }

    /// Validates the page and fetches its items in listing order.
    pub fn list_page(
        &self,
        author: &str,
        kind: ContentKind,
        page: u32,
        page_size: u32,
    ) -> ServiceResult<(PaginationContext, Vec<ContentItem>)> {
        let context = self.paginate(author, kind, page, page_size)?;
        let items = self.paginator.fetch_page(author, kind, &context)?;
        Ok((context, items))
    }

    pub fn list_archived(
        &self,
        author: &str,
        kind: ContentKind,
    ) -> ServiceResult<Vec<ContentItem>> {
        self.authors.require_author(author)?;
        self.lifecycle.list_archived(author, kind)
    }

    pub fn list_featured(
        &self,
        author: &str,
        kind: ContentKind,
    ) -> ServiceResult<Vec<ContentItem>> {
        self.authors.require_author(author)?;
        self.lifecycle.list_featured(author, kind)
    }

    /// Counts a view on the item and on its author's total.
    pub fn increment_view(&self, id: &str) -> ServiceResult<()> {
        self.counters.increment_view(id)
    }

    pub fn increment_read(&self, id: &str) -> ServiceResult<()> {
        self.counters.increment_read(id)
    }

    pub fn list_tags(&self, author: &str) -> ServiceResult<Vec<TagCount>> {
        self.authors.require_author(author)?;
        Ok(self.lifecycle.ledger().list_active(author)?)
    }
}
