//! Input validation shared by item and comment drafts.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const TITLE_MAX_CHARS: usize = 200;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9.\-_]*[a-zA-Z0-9]$").expect("valid username regex")
});

/// Rejected caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankTitle,
    TitleTooLong { chars: usize, max: usize },
    InvalidAuthor(String),
    BlankCommentName,
    BlankCommentBody,
    ZeroPageSize,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "title has {chars} chars, at most {max} allowed")
            }
            Self::InvalidAuthor(value) => write!(f, "invalid author name: `{value}`"),
            Self::BlankCommentName => write!(f, "comment name must not be blank"),
            Self::BlankCommentBody => write!(f, "comment body must not be blank"),
            Self::ZeroPageSize => write!(f, "page size must be at least 1"),
        }
    }
}

impl Error for ValidationError {}

/// Checks an author username: alphanumerics with inner `.`, `-` or `_`.
pub fn validate_author(author: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(author) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAuthor(author.to_string()))
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    let chars = title.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            chars,
            max: TITLE_MAX_CHARS,
        });
    }
    Ok(())
}
