//! Replaces bare 404/500 responses with the site's rendered error pages.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result, web};

use crate::middleware::auth::identify;
use crate::state::AppState;
use crate::views::base_context;

/// Error page handlers, to be wrapped around the whole app.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, server_error)
}

fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    tracing::debug!(path = %res.request().path(), "Rendering 404 page");
    render_page(res, "misc/404.html")
}

fn server_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    if let Some(error) = res.response().error() {
        tracing::error!(path = %res.request().path(), error = %error, "Rendering 500 page");
    }
    render_page(res, "misc/500.html")
}

fn render_page<B>(res: ServiceResponse<B>, template: &str) -> Result<ErrorHandlerResponse<B>> {
    let Some(state) = res.request().app_data::<web::Data<AppState>>().cloned() else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };

    let viewer = identify(res.request());
    let mut ctx = base_context(viewer.as_ref());
    ctx.insert("path", res.request().path());

    let body = match state.templates.render(template, &ctx) {
        Ok(body) => body,
        // Keep the original response rather than failing twice.
        Err(_) => return Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    };

    let (req, original) = res.into_parts();
    let response = HttpResponse::build(original.status())
        .content_type(ContentType::html())
        .body(body);

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
