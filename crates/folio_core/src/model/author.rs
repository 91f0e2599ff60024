//! Author account model.
//!
//! Only the parts the content core reads or writes live here: the username
//! every item points at, the display blog name and the running view total.

use crate::model::validation::{validate_author, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub blogname: String,
    /// Sum of item views across the author's lifetime, deleted items included.
    pub total_views: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Author {
    /// Builds a validated author record with zero views.
    pub fn new(
        username: impl Into<String>,
        blogname: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ValidationError> {
        let username = username.into();
        validate_author(&username)?;
        Ok(Self {
            username,
            blogname: blogname.into().trim().to_string(),
            total_views: 0,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Author;
    use crate::model::validation::ValidationError;

    #[test]
    fn new_validates_username_and_trims_blogname() {
        let author = Author::new("ann.dev", "  Ann writes  ", 7).unwrap();
        assert_eq!(author.blogname, "Ann writes");
        assert_eq!(author.total_views, 0);

        assert!(matches!(
            Author::new("ann_", "", 0),
            Err(ValidationError::InvalidAuthor(_))
        ));
    }
}
