//! Template view models and shared context builders.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::Context;

use quill_core::ValidationErrors;
use quill_core::domain::{AuthorSummary, CommentEntry, Group, GroupSummary, Page, PostEntry};

use crate::middleware::auth::Identity;
use crate::urls;

fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%d %b %Y %H:%M").to_string()
}

/// A post as rendered in feeds and on its own page.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: i32,
    pub text: String,
    pub pub_date: String,
    pub image: Option<String>,
    pub author: AuthorSummary,
    pub group: Option<GroupSummary>,
    pub url: String,
    pub edit_url: String,
    pub comment_url: String,
    pub author_url: String,
    pub group_url: Option<String>,
}

impl From<PostEntry> for PostCard {
    fn from(entry: PostEntry) -> Self {
        let username = entry.author.username.as_str();
        Self {
            id: entry.post.id,
            url: urls::post(username, entry.post.id),
            edit_url: urls::post_edit(username, entry.post.id),
            comment_url: urls::add_comment(username, entry.post.id),
            author_url: urls::profile(username),
            group_url: entry.group.as_ref().map(|g| urls::group(&g.slug)),
            pub_date: display_date(&entry.post.pub_date),
            text: entry.post.text,
            image: entry.post.image,
            author: entry.author,
            group: entry.group,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub text: String,
    pub created: String,
    pub author: AuthorSummary,
    pub author_url: String,
}

impl From<CommentEntry> for CommentView {
    fn from(entry: CommentEntry) -> Self {
        Self {
            id: entry.comment.id,
            created: display_date(&entry.comment.created),
            author_url: urls::profile(&entry.author.username),
            text: entry.comment.text,
            author: entry.author,
        }
    }
}

/// Paginator state for `includes/paginator.html`.
#[derive(Debug, Clone, Serialize)]
pub struct Paginator {
    pub number: u64,
    pub num_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

impl<T> From<&Page<T>> for Paginator {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            total_items: page.total_items,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            next_page_number: page.next_page_number(),
            previous_page_number: page.previous_page_number(),
        }
    }
}

/// Entry of the group select box.
#[derive(Debug, Clone, Serialize)]
pub struct GroupOption {
    pub id: i32,
    pub title: String,
    pub selected: bool,
}

pub fn group_options(groups: Vec<Group>, selected: Option<&str>) -> Vec<GroupOption> {
    groups
        .into_iter()
        .map(|group| GroupOption {
            selected: selected == Some(group.id.to_string().as_str()),
            id: group.id,
            title: group.title,
        })
        .collect()
}

/// Context every page starts from: the viewer (or null) and empty errors.
pub fn base_context(viewer: Option<&Identity>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("viewer", &viewer);
    ctx.insert("errors", &BTreeMap::<&str, String>::new());
    ctx
}

/// Insert a feed page as `posts` plus its `page` paginator.
pub fn insert_feed(ctx: &mut Context, page: Page<PostEntry>) {
    ctx.insert("page", &Paginator::from(&page));
    let posts: Vec<PostCard> = page.items.into_iter().map(PostCard::from).collect();
    ctx.insert("posts", &posts);
}

/// Per-field messages for `fields`, empty where the field is valid, so
/// templates can test every key without tripping on undefined lookups.
pub fn insert_errors(ctx: &mut Context, errors: &ValidationErrors, fields: &[&'static str]) {
    let mut messages: BTreeMap<&str, String> =
        fields.iter().map(|field| (*field, String::new())).collect();
    for (field, message) in errors.iter() {
        messages.insert(field, message.to_string());
    }
    ctx.insert("errors", &messages);
}
