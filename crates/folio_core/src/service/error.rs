//! Service-level error taxonomy.
//!
//! Maps onto the three failure classes the HTTP layer distinguishes:
//! not-found (`ItemNotFound`, `AuthorNotFound`, `PageNotFound`), a transition that is illegal
//! from the current state (`InvalidState`), and storage failures (`Repo`),
//! which propagate unmodified and are never retried here.

use crate::model::item::{ItemId, ItemState};
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Caller-supplied primitive failed validation.
    InvalidInput(ValidationError),
    /// Unknown item (or comment target) id.
    ItemNotFound(ItemId),
    /// No author account under this username.
    AuthorNotFound(String),
    /// Username already taken at registration.
    AuthorExists(String),
    /// Requested page lies outside `1..=max_page`.
    PageNotFound { page: u32, max_page: u32 },
    /// Transition not allowed from the item's current state.
    InvalidState {
        item_id: ItemId,
        state: ItemState,
        action: &'static str,
    },
    /// Storage collaborator failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether the HTTP layer should answer with a not-found response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound(_) | Self::AuthorNotFound(_) | Self::PageNotFound { .. }
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::AuthorNotFound(username) => write!(f, "author not found: {username}"),
            Self::AuthorExists(username) => write!(f, "author already exists: {username}"),
            Self::PageNotFound { page, max_page } => {
                write!(f, "page {page} not found (max page {max_page})")
            }
            Self::InvalidState {
                item_id,
                state,
                action,
            } => write!(
                f,
                "cannot {action} item {item_id} while it is {}",
                state.as_str()
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            RepoError::Validation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}
