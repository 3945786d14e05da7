use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Comment, CommentDraft, CommentEntry, FeedScope, Follow, FollowStats, Group, NewGroup, Page,
    PageRequest, Post, PostDraft, PostEntry, User,
};
use crate::error::RepoError;

/// Generic repository trait for lookups and removal by primary key.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with account-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Insert a new user. A taken username is a `RepoError::Constraint`.
    async fn create(&self, user: User) -> Result<User, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i32> {
    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title, for the post form.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository; also the feed composer's query side.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, RepoError>;

    /// Replace a post's text, group and image. The author is never touched.
    async fn update(&self, post_id: i32, draft: PostDraft) -> Result<Post, RepoError>;

    /// Load a post only if it was written by `username`.
    async fn find_entry(&self, post_id: i32, username: &str)
    -> Result<Option<PostEntry>, RepoError>;

    /// One page of posts for `scope`, newest first.
    async fn feed(&self, scope: FeedScope, page: PageRequest)
    -> Result<Page<PostEntry>, RepoError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    async fn create(
        &self,
        post_id: i32,
        author_id: Uuid,
        draft: CommentDraft,
    ) -> Result<Comment, RepoError>;

    /// Comments on a post, newest first.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentEntry>, RepoError>;
}

/// Follow graph storage. Both mutations are idempotent.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Store the edge; returns `false` when it already existed.
    async fn follow(&self, follow: Follow) -> Result<bool, RepoError>;

    /// Remove the edge; returns `false` when there was nothing to remove.
    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    async fn stats(&self, user_id: Uuid) -> Result<FollowStats, RepoError>;
}
