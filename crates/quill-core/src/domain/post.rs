use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationErrors;

pub const EMPTY_POST_MESSAGE: &str =
    "Posts without text are of little interest to anyone, please share your story!";

/// Number of characters shown when a post is displayed as a short label.
const PREVIEW_CHARS: usize = 15;

/// Post entity - a single authored publication.
///
/// `author_id` is fixed at creation; updates go through [`PostDraft`], which
/// has no author field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl Post {
    pub fn is_editable_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.text.chars().take(PREVIEW_CHARS).collect();
        f.write_str(&preview)
    }
}

/// Validated content for creating or editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn new(
        text: &str,
        group_id: Option<i32>,
        image: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationErrors::single("text", EMPTY_POST_MESSAGE));
        }

        let image = image
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(str::to_string);

        Ok(Self {
            text: text.to_string(),
            group_id,
            image,
        })
    }
}

/// Public part of a user shown next to their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
}

impl AuthorSummary {
    pub fn new(id: Uuid, username: String, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            username,
            full_name: super::user::full_name(first_name, last_name),
        }
    }
}

impl From<&super::User> for AuthorSummary {
    fn from(user: &super::User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name(),
        }
    }
}

/// Group reference shown on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: i32,
    pub slug: String,
    pub title: String,
}

/// A post joined with its author and group, as shown in feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEntry {
    pub post: Post,
    pub author: AuthorSummary,
    pub group: Option<GroupSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id: Uuid::new_v4(),
            group_id: None,
            image: None,
        }
    }

    #[test]
    fn test_display_is_first_fifteen_chars() {
        let post = post(&"тест".repeat(20));
        assert_eq!(post.to_string(), "тесттесттесттес");
        assert_eq!(post.to_string().chars().count(), 15);
    }

    #[test]
    fn test_blank_text_rejected() {
        for text in ["", "   ", "\n\t"] {
            let errors = PostDraft::new(text, None, None).unwrap_err();
            assert_eq!(errors.get("text"), Some(EMPTY_POST_MESSAGE));
        }
    }

    #[test]
    fn test_draft_trims_and_drops_empty_image() {
        let draft = PostDraft::new("  hello  ", Some(3), Some("  ")).unwrap();
        assert_eq!(draft.text, "hello");
        assert_eq!(draft.group_id, Some(3));
        assert_eq!(draft.image, None);
    }

    #[test]
    fn test_only_author_can_edit() {
        let post = post("text");
        assert!(post.is_editable_by(post.author_id));
        assert!(!post.is_editable_by(Uuid::new_v4()));
    }
}
