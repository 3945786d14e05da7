//! Static pages.

use actix_web::{HttpResponse, web};

use super::posts::html;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::base_context;

async fn render_static(
    state: &AppState,
    viewer: &OptionalIdentity,
    template: &str,
) -> AppResult<HttpResponse> {
    let ctx = base_context(viewer.viewer());
    Ok(html(state.templates.render(template, &ctx)?))
}

/// GET /about/author/
pub async fn author(state: web::Data<AppState>, viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    render_static(&state, &viewer, "about/author.html").await
}

/// GET /about/tech/
pub async fn tech(state: web::Data<AppState>, viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    render_static(&state, &viewer, "about/tech.html").await
}
