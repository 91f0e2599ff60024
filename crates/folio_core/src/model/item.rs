//! Content item model.
//!
//! # Responsibility
//! - Define the record shared by post, project and changelog listings.
//! - Provide the lifecycle state enum the state machine operates on.
//!
//! # Invariants
//! - Items start `Active`; only `Active` items count toward tag totals.
//! - `featured` is only meaningful while `Active`. It is left untouched by
//!   archive, so a restored item comes back featured if it was before.

use crate::model::tags::{normalize_tags, parse_tags_csv};
use crate::model::validation::{validate_title, ValidationError};
use serde::{Deserialize, Serialize};

/// Short random identifier, 8 chars from `[a-z0-9]`.
pub type ItemId = String;

/// Kind of authored content. Each kind is listed and paginated separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Project,
    Changelog,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [Self::Post, Self::Project, Self::Changelog];

    /// Stable lowercase label, also used as the storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Project => "project",
            Self::Changelog => "changelog",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Lifecycle state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Listed publicly and counted in the tag ledger.
    Active,
    /// Hidden from default listings and excluded from tag counts.
    Archived,
}

impl ItemState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Which view/read counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Views,
    Reads,
}

impl CounterField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Reads => "reads",
        }
    }
}

/// Canonical stored record for a post, project or changelog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub kind: ContentKind,
    pub author: String,
    pub title: String,
    pub subtitle: String,
    /// Markdown source. Rendering happens outside the core.
    pub body: String,
    pub cover_url: Option<String>,
    pub custom_slug: Option<String>,
    /// Sorted and deduplicated.
    pub tags: Vec<String>,
    pub state: ItemState,
    pub featured: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub last_updated: i64,
    pub views: i64,
    pub reads: i64,
}

impl ContentItem {
    pub fn is_active(&self) -> bool {
        self.state == ItemState::Active
    }
}

/// Caller-editable fields of an item, used for both create and update.
///
/// `update` replaces every field wholesale, the same way a submitted edit
/// form does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
    pub custom_slug: Option<String>,
}

impl ItemDraft {
    /// Builds a draft from a title and a raw comma-separated tag string.
    pub fn new(title: impl Into<String>, tags_csv: &str) -> Self {
        Self {
            title: title.into(),
            tags: parse_tags_csv(tags_csv),
            ..Self::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }

    pub fn with_custom_slug(mut self, custom_slug: impl Into<String>) -> Self {
        self.custom_slug = Some(custom_slug.into());
        self
    }

    /// Re-normalizes `tags`, for drafts whose tag list was set directly.
    pub fn normalized(mut self) -> Self {
        self.tags = normalize_tags(&self.tags);
        self
    }

    /// Validates caller-controlled fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}
