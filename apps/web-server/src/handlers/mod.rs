//! HTTP handlers and route configuration.

mod about;
mod auth;
mod health;
mod posts;
mod profiles;

use actix_web::{HttpResponse, web};

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// Fixed prefixes are registered before the `/{username}/...` patterns so
/// they are never captured as usernames.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/health/", web::get().to(health::health_check))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::create_post)),
        )
        .route("/follow/", web::get().to(profiles::follow_index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .service(
            web::scope("/about")
                .route("/author/", web::get().to(about::author))
                .route("/tech/", web::get().to(about::tech)),
        )
        .service(
            web::scope("/auth")
                .wrap(RateLimitMiddleware)
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .route("/logout/", web::get().to(auth::logout)),
        )
        .route("/{username}/", web::get().to(profiles::profile))
        .route(
            "/{username}/follow/",
            web::get().to(profiles::profile_follow),
        )
        .route(
            "/{username}/unfollow/",
            web::get().to(profiles::profile_unfollow),
        )
        .route("/{username}/{post_id}/", web::get().to(posts::post_view))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::edit_post_form))
                .route(web::post().to(posts::update_post)),
        )
        .service(
            web::resource("/{username}/{post_id}/comment/")
                .route(web::post().to(posts::add_comment))
                .route(web::get().to(posts::comment_redirect)),
        )
        .default_service(web::to(|| async { HttpResponse::NotFound().finish() }));
}
