use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::AuthorSummary;
use crate::error::ValidationErrors;

/// Comment entity - a reader's reply under a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Validated comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub text: String,
}

impl CommentDraft {
    pub fn new(text: &str) -> Result<Self, ValidationErrors> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationErrors::single("text", "This field is required."));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

/// A comment joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author: AuthorSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_comment_rejected() {
        let errors = CommentDraft::new("  ").unwrap_err();
        assert_eq!(errors.get("text"), Some("This field is required."));
    }
}
