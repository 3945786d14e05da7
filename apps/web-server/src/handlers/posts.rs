//! Feeds, post pages, post editing and comments.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tera::Context;

use quill_core::ValidationErrors;
use quill_core::domain::{CommentDraft, FeedScope, PageRequest, PostDraft, PostEntry};
use quill_shared::dto::{CommentForm, PageQuery, PostForm};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;
use crate::views::{
    CommentView, PostCard, base_context, group_options, insert_errors, insert_feed,
};

const POST_FORM_FIELDS: &[&str] = &["text", "group"];
const INVALID_GROUP_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn index_cache_key(viewer: Option<&Identity>, page: &PageRequest) -> String {
    let viewer = viewer.map_or_else(|| "anonymous".to_string(), |v| v.user_id.to_string());
    let page = page
        .requested()
        .map_or_else(|| "-".to_string(), |n| n.to_string());
    format!("index:{viewer}:{page}")
}

/// GET / - the global feed, served from the page cache while fresh.
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::parse(query.page.as_deref());
    let key = index_cache_key(viewer.viewer(), &page);

    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(key = %key, "Index page served from cache");
        return Ok(html(body));
    }

    let feed = state.posts.feed(FeedScope::All, page).await?;
    let mut ctx = base_context(viewer.viewer());
    insert_feed(&mut ctx, feed);
    let body = state.templates.render("index.html", &ctx)?;

    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.index_cache_ttl))
        .await
    {
        tracing::warn!(key = %key, error = %e, "Failed to cache index page");
    }

    Ok(html(body))
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {slug}")))?;

    let feed = state
        .posts
        .feed(
            FeedScope::Group(group.id),
            PageRequest::parse(query.page.as_deref()),
        )
        .await?;

    let mut ctx = base_context(viewer.viewer());
    ctx.insert("group", &group);
    insert_feed(&mut ctx, feed);

    Ok(html(state.templates.render("group.html", &ctx)?))
}

#[derive(Serialize)]
struct PostFormView<'a> {
    text: &'a str,
    image: &'a str,
}

/// Render the create/edit form. `post_url` is set when editing.
async fn render_post_form(
    state: &AppState,
    identity: &Identity,
    form: &PostForm,
    errors: &ValidationErrors,
    post_url: Option<String>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;

    let mut ctx = base_context(Some(identity));
    ctx.insert(
        "form",
        &PostFormView {
            text: &form.text,
            image: form.image.as_deref().unwrap_or(""),
        },
    );
    ctx.insert("groups", &group_options(groups, form.group.as_deref()));
    ctx.insert("post_url", &post_url);
    insert_errors(&mut ctx, errors, POST_FORM_FIELDS);

    Ok(html(state.templates.render("new_post.html", &ctx)?))
}

/// Validate a submitted post form, including the chosen group.
async fn clean_post_form(
    state: &AppState,
    form: &PostForm,
) -> AppResult<Result<PostDraft, ValidationErrors>> {
    let mut errors = ValidationErrors::new();

    let group_id = match form.group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let group = match raw.parse::<i32>() {
                Ok(id) => state.groups.find_by_id(id).await?,
                Err(_) => None,
            };
            if group.is_none() {
                errors.add("group", INVALID_GROUP_MESSAGE);
            }
            group.map(|g| g.id)
        }
    };

    match PostDraft::new(&form.text, group_id, form.image.as_deref()) {
        Ok(draft) if errors.is_empty() => Ok(Ok(draft)),
        Ok(_) => Ok(Err(errors)),
        Err(text_errors) => {
            for (field, message) in text_errors.iter() {
                errors.add(field, message);
            }
            Ok(Err(errors))
        }
    }
}

/// GET /new/
pub async fn new_post_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    render_post_form(
        &state,
        &identity,
        &PostForm::default(),
        &ValidationErrors::new(),
        None,
    )
    .await
}

/// POST /new/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let draft = match clean_post_form(&state, &form).await? {
        Ok(draft) => draft,
        Err(errors) => {
            tracing::debug!(user = %identity.username, %errors, "Rejected post form");
            return render_post_form(&state, &identity, &form, &errors, None).await;
        }
    };

    state.posts.create(identity.user_id, draft).await?;
    Ok(redirect(urls::INDEX))
}

async fn find_entry(state: &AppState, username: &str, post_id: i32) -> AppResult<PostEntry> {
    state
        .posts
        .find_entry(post_id, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} by {username}")))
}

/// Render a post page, optionally re-displaying a rejected comment.
async fn render_post_page(
    state: &AppState,
    viewer: Option<&Identity>,
    entry: PostEntry,
    comment_text: &str,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let count_posts = state.posts.count_by_author(entry.author.id).await?;
    let comments: Vec<CommentView> = state
        .comments
        .list_for_post(entry.post.id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    let mut ctx: Context = base_context(viewer);
    ctx.insert("post", &PostCard::from(entry));
    ctx.insert("count_posts", &count_posts);
    ctx.insert("comments", &comments);
    ctx.insert("comment_text", comment_text);
    insert_errors(&mut ctx, errors, &["text"]);

    Ok(html(state.templates.render("post.html", &ctx)?))
}

/// GET /{username}/{post_id}/
pub async fn post_view(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<(String, i32)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let entry = find_entry(&state, &username, post_id).await?;

    render_post_page(&state, viewer.viewer(), entry, "", &ValidationErrors::new()).await
}

/// GET /{username}/{post_id}/edit/
pub async fn edit_post_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i32)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let entry = find_entry(&state, &username, post_id).await?;
    let post_url = urls::post(&entry.author.username, post_id);

    if !entry.post.is_editable_by(identity.user_id) {
        return Ok(redirect(&post_url));
    }

    let form = PostForm {
        text: entry.post.text,
        group: entry.post.group_id.map(|id| id.to_string()),
        image: entry.post.image,
    };
    render_post_form(
        &state,
        &identity,
        &form,
        &ValidationErrors::new(),
        Some(post_url),
    )
    .await
}

/// POST /{username}/{post_id}/edit/
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i32)>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let entry = find_entry(&state, &username, post_id).await?;
    let post_url = urls::post(&entry.author.username, post_id);

    if !entry.post.is_editable_by(identity.user_id) {
        tracing::warn!(
            user = %identity.username,
            post_id,
            "Edit attempt by a non-author"
        );
        return Ok(redirect(&post_url));
    }

    let form = form.into_inner();
    match clean_post_form(&state, &form).await? {
        Ok(draft) => {
            state.posts.update(post_id, draft).await?;
            Ok(redirect(&post_url))
        }
        Err(errors) => render_post_form(&state, &identity, &form, &errors, Some(post_url)).await,
    }
}

/// POST /{username}/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i32)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let entry = find_entry(&state, &username, post_id).await?;

    match CommentDraft::new(&form.text) {
        Ok(draft) => {
            state
                .comments
                .create(post_id, identity.user_id, draft)
                .await?;
            Ok(redirect(&urls::post(&entry.author.username, post_id)))
        }
        Err(errors) => {
            render_post_page(&state, Some(&identity), entry, &form.text, &errors).await
        }
    }
}

/// GET /{username}/{post_id}/comment/ - nothing to show, back to the post.
pub async fn comment_redirect(path: web::Path<(String, i32)>) -> HttpResponse {
    let (username, post_id) = path.into_inner();
    redirect(&urls::post(&username, post_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_index_cache_key_separates_viewers_and_pages() {
        let viewer = Identity {
            user_id: Uuid::nil(),
            username: "leo".to_string(),
        };

        let anonymous = index_cache_key(None, &PageRequest::parse(None));
        let signed_in = index_cache_key(Some(&viewer), &PageRequest::parse(None));
        let second = index_cache_key(None, &PageRequest::parse(Some("2")));

        assert_eq!(anonymous, "index:anonymous:-");
        assert_ne!(anonymous, signed_in);
        assert_eq!(second, "index:anonymous:2");
    }
}
