//! Author profiles, the follow feed and follow toggles.

use actix_web::{HttpResponse, web};

use quill_core::domain::{AuthorSummary, FeedScope, Follow, FollowDecision, PageRequest, User};
use quill_shared::dto::PageQuery;

use super::posts::{html, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;
use crate::views::{base_context, insert_feed};

async fn find_author(state: &AppState, username: &str) -> AppResult<User> {
    state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username}")))
}

/// GET /{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path).await?;

    let feed = state
        .posts
        .feed(
            FeedScope::Author(author.id),
            PageRequest::parse(query.page.as_deref()),
        )
        .await?;
    let stats = state.follows.stats(author.id).await?;
    let following = match viewer.viewer() {
        Some(v) if v.user_id != author.id => {
            state.follows.is_following(v.user_id, author.id).await?
        }
        _ => false,
    };

    let mut ctx = base_context(viewer.viewer());
    ctx.insert("author", &AuthorSummary::from(&author));
    ctx.insert("count_posts", &feed.total_items);
    ctx.insert("stats", &stats);
    ctx.insert("following", &following);
    ctx.insert("follow_url", &urls::profile_follow(&author.username));
    ctx.insert("unfollow_url", &urls::profile_unfollow(&author.username));
    insert_feed(&mut ctx, feed);

    Ok(html(state.templates.render("profile.html", &ctx)?))
}

/// GET /follow/ - posts by the authors the viewer follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let feed = state
        .posts
        .feed(
            FeedScope::FollowedBy(identity.user_id),
            PageRequest::parse(query.page.as_deref()),
        )
        .await?;

    let mut ctx = base_context(Some(&identity));
    insert_feed(&mut ctx, feed);

    Ok(html(state.templates.render("follow.html", &ctx)?))
}

/// GET /{username}/follow/
pub async fn profile_follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path).await?;

    match Follow::decide(identity.user_id, author.id) {
        FollowDecision::Store(edge) => {
            let created = state.follows.follow(edge).await?;
            tracing::info!(
                user = %identity.username,
                author = %author.username,
                created,
                "Follow requested"
            );
        }
        FollowDecision::SelfFollow => {
            tracing::debug!(user = %identity.username, "Ignoring self-follow");
        }
    }

    Ok(redirect(&urls::profile(&author.username)))
}

/// GET /{username}/unfollow/
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = find_author(&state, &path).await?;

    let removed = state.follows.unfollow(identity.user_id, author.id).await?;
    tracing::info!(
        user = %identity.username,
        author = %author.username,
        removed,
        "Unfollow requested"
    );

    Ok(redirect(&urls::profile(&author.username)))
}
