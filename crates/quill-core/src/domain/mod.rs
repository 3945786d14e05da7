//! Domain entities - the core business objects.

mod comment;
mod feed;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentDraft, CommentEntry};
pub use feed::{FeedScope, PAGE_SIZE, Page, PageRequest, page_count};
pub use follow::{Follow, FollowDecision, FollowStats};
pub use group::{Group, NewGroup};
pub use post::{AuthorSummary, EMPTY_POST_MESSAGE, GroupSummary, Post, PostDraft, PostEntry};
pub use user::{PASSWORD_MIN_LEN, RESERVED_USERNAMES, Registration, User, validate_username};
