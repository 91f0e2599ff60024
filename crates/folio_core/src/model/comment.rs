//! Comment model. Comments hang off a content item and are removed with it.

use crate::model::item::ItemId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

pub type CommentId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub item_id: ItemId,
    pub name: String,
    pub body: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Visitor-submitted comment fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub name: String,
    pub body: String,
}

impl CommentDraft {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankCommentName);
        }
        if self.body.trim().is_empty() {
            return Err(ValidationError::BlankCommentBody);
        }
        Ok(())
    }
}
