use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;

/// Group entity - a named category posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Data for a group that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    pub fn new(title: &str, slug: &str, description: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = title.trim();
        let slug = slug.trim();

        if title.is_empty() {
            errors.add("title", "This field is required.");
        }
        if title.chars().count() > 200 {
            errors.add("title", "Ensure this value has at most 200 characters.");
        }
        if !is_valid_slug(slug) {
            errors.add(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            );
        }
        errors.into_result()?;

        Ok(Self {
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.trim().to_string(),
        })
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 200
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
