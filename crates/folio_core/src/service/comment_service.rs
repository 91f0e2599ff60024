//! Comment use-case service.
//!
//! Comments can only be added to `Active` items. They are never removed
//! individually here; deleting the item removes them in storage.

use crate::model::comment::{Comment, CommentDraft, CommentId};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::item_repo::ItemRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::now_epoch_ms;
use crate::service::uid_generator::UidGenerator;
use log::info;

pub struct CommentService<I: ItemRepository, C: CommentRepository> {
    items: I,
    comments: C,
    uid: UidGenerator,
}

impl<I: ItemRepository, C: CommentRepository> CommentService<I, C> {
    pub fn new(items: I, comments: C) -> Self {
        Self {
            items,
            comments,
            uid: UidGenerator::new(),
        }
    }

    pub fn with_uid_generator(mut self, uid: UidGenerator) -> Self {
        self.uid = uid;
        self
    }

    /// Adds a comment to an active item and returns the new comment id.
    pub fn add_comment(&mut self, item_id: &str, draft: CommentDraft) -> ServiceResult<CommentId> {
        draft.validate()?;
        self.require_active_item(item_id)?;

        let id = self.uid.generate(&self.comments)?;
        let comment = Comment {
            id: id.clone(),
            item_id: item_id.to_string(),
            name: draft.name.trim().to_string(),
            body: draft.body,
            created_at: now_epoch_ms(),
        };
        self.comments.insert_comment(&comment)?;

        info!("event=comment_create module=comments status=ok item_id={item_id} comment_id={id}");
        Ok(id)
    }

    /// Comments of an existing item, oldest first.
    pub fn list_comments(&self, item_id: &str) -> ServiceResult<Vec<Comment>> {
        if self.items.get_item(item_id)?.is_none() {
            return Err(ServiceError::ItemNotFound(item_id.to_string()));
        }
        Ok(self.comments.list_for_item(item_id)?)
    }

    fn require_active_item(&self, item_id: &str) -> ServiceResult<()> {
        match self.items.get_item(item_id)? {
            Some(item) if item.is_active() => Ok(()),
            _ => Err(ServiceError::ItemNotFound(item_id.to_string())),
        }
    }
}
