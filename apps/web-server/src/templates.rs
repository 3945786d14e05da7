//! Tera templates compiled into the binary.

use tera::{Context, Tera};

use crate::middleware::error::AppError;

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name)))
    };
}

/// The site's template set.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            template!("base.html"),
            template!("includes/post_card.html"),
            template!("includes/paginator.html"),
            template!("index.html"),
            template!("group.html"),
            template!("follow.html"),
            template!("profile.html"),
            template!("post.html"),
            template!("new_post.html"),
            template!("auth/signup.html"),
            template!("auth/login.html"),
            template!("auth/logged_out.html"),
            template!("about/author.html"),
            template!("about/tech.html"),
            template!("misc/404.html"),
            template!("misc/500.html"),
        ])?;

        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, ctx: &Context) -> Result<String, AppError> {
        self.tera.render(name, ctx).map_err(|e| {
            tracing::error!(template = name, error = ?e, "Template rendering failed");
            AppError::Internal(format!("failed to render {name}"))
        })
    }
}
