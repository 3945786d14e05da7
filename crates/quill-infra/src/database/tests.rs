use std::sync::Arc;

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseBackend, DbConn, MockDatabase};
use uuid::Uuid;

use quill_core::domain::{
    CommentDraft, FeedScope, Follow, Group, NewGroup, PageRequest, Post, PostDraft, Registration,
    User,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};

use crate::database::entity::post;
use crate::database::{
    SqlCommentRepository, SqlFollowRepository, SqlGroupRepository, SqlPostRepository,
    SqlUserRepository,
};

async fn setup_db() -> Arc<DbConn> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

async fn create_user(db: &Arc<DbConn>, username: &str) -> User {
    let registration = Registration::new(
        username,
        &format!("{username}@example.com"),
        "Leo",
        "Tolstoy",
        "war-and-peace",
        "war-and-peace",
    )
    .unwrap();

    SqlUserRepository::new(db.clone())
        .create(User::new(registration, "hash".to_string()))
        .await
        .unwrap()
}

async fn create_post(db: &Arc<DbConn>, author: &User, text: &str, group: Option<&Group>) -> Post {
    let draft = PostDraft::new(text, group.map(|g| g.id), None).unwrap();
    SqlPostRepository::new(db.clone())
        .create(author.id, draft)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: 7,
            text: "Test Post".to_owned(),
            pub_date: now.into(),
            author_id,
            group_id: None,
            image: None,
        }]])
        .into_connection();

    let repo = SqlPostRepository::new(Arc::new(db));

    let result: Option<Post> = repo.find_by_id(7).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.text, "Test Post");
    assert_eq!(post.id, 7);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_duplicate_username_is_constraint_error() {
    let db = setup_db().await;
    create_user(&db, "leo").await;

    let registration =
        Registration::new("leo", "", "", "", "another-pass", "another-pass").unwrap();
    let err = SqlUserRepository::new(db.clone())
        .create(User::new(registration, "hash".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_feed_pages_hold_ten_posts_newest_first() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    for n in 0..13 {
        create_post(&db, &author, &format!("post {n}"), None).await;
    }
    let repo = SqlPostRepository::new(db.clone());

    let first = repo
        .feed(FeedScope::All, PageRequest::parse(None))
        .await
        .unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.total_items, 13);
    assert_eq!(first.items[0].post.text, "post 12");
    assert_eq!(first.items[0].author.username, "leo");
    assert_eq!(first.items[0].author.full_name, "Leo Tolstoy");

    let second = repo
        .feed(FeedScope::All, PageRequest::parse(Some("2")))
        .await
        .unwrap();
    assert_eq!(second.len(), 3);
    assert_eq!(second.items[2].post.text, "post 0");

    let beyond = repo
        .feed(FeedScope::All, PageRequest::parse(Some("99")))
        .await
        .unwrap();
    assert_eq!(beyond.number, 2);
}

#[tokio::test]
async fn test_empty_feed_has_one_page() {
    let db = setup_db().await;
    let repo = SqlPostRepository::new(db);

    let page = repo
        .feed(FeedScope::All, PageRequest::parse(Some("abc")))
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.num_pages, 1);
}

#[tokio::test]
async fn test_group_feed_only_contains_group_posts() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    let group = SqlGroupRepository::new(db.clone())
        .create(NewGroup::new("Novels", "novels", "Long stories").unwrap())
        .await
        .unwrap();

    create_post(&db, &author, "in group", Some(&group)).await;
    create_post(&db, &author, "no group", None).await;

    let page = SqlPostRepository::new(db.clone())
        .feed(FeedScope::Group(group.id), PageRequest::first())
        .await
        .unwrap();

    assert_eq!(page.total_items, 1);
    let entry = &page.items[0];
    assert_eq!(entry.post.text, "in group");
    assert_eq!(entry.group.as_ref().map(|g| g.slug.as_str()), Some("novels"));
}

#[tokio::test]
async fn test_follow_feed_only_contains_followed_authors() {
    let db = setup_db().await;
    let reader = create_user(&db, "reader").await;
    let followed = create_user(&db, "followed").await;
    let stranger = create_user(&db, "stranger").await;

    create_post(&db, &followed, "from followed", None).await;
    create_post(&db, &stranger, "from stranger", None).await;

    let follows = SqlFollowRepository::new(db.clone());
    assert!(
        follows
            .follow(Follow {
                user_id: reader.id,
                author_id: followed.id,
            })
            .await
            .unwrap()
    );

    let page = SqlPostRepository::new(db.clone())
        .feed(FeedScope::FollowedBy(reader.id), PageRequest::first())
        .await
        .unwrap();

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].post.text, "from followed");

    // Nobody followed: empty feed.
    let page = SqlPostRepository::new(db)
        .feed(FeedScope::FollowedBy(stranger.id), PageRequest::first())
        .await
        .unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_double_follow_stores_one_edge() {
    let db = setup_db().await;
    let reader = create_user(&db, "reader").await;
    let author = create_user(&db, "author").await;
    let follows = SqlFollowRepository::new(db);
    let edge = Follow {
        user_id: reader.id,
        author_id: author.id,
    };

    assert!(follows.follow(edge).await.unwrap());
    assert!(!follows.follow(edge).await.unwrap());

    let stats = follows.stats(author.id).await.unwrap();
    assert_eq!(stats.followers, 1);
    assert_eq!(stats.following, 0);
    assert!(follows.is_following(reader.id, author.id).await.unwrap());

    assert!(follows.unfollow(reader.id, author.id).await.unwrap());
    assert!(!follows.unfollow(reader.id, author.id).await.unwrap());
    assert!(!follows.is_following(reader.id, author.id).await.unwrap());
}

#[tokio::test]
async fn test_deleting_group_keeps_posts() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    let groups = SqlGroupRepository::new(db.clone());
    let group = groups
        .create(NewGroup::new("Novels", "novels", "").unwrap())
        .await
        .unwrap();
    let post = create_post(&db, &author, "grouped", Some(&group)).await;

    BaseRepository::<Group, i32>::delete(&groups, group.id)
        .await
        .unwrap();

    let posts = SqlPostRepository::new(db);
    let reloaded: Post = posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(reloaded.group_id, None);
}

#[tokio::test]
async fn test_deleting_post_removes_comments() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    let post = create_post(&db, &author, "commented", None).await;

    let comments = SqlCommentRepository::new(db.clone());
    comments
        .create(post.id, author.id, CommentDraft::new("first").unwrap())
        .await
        .unwrap();
    comments
        .create(post.id, author.id, CommentDraft::new("second").unwrap())
        .await
        .unwrap();

    let listed = comments.list_for_post(post.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].comment.text, "second");
    assert_eq!(listed[0].author.username, "leo");

    let posts = SqlPostRepository::new(db.clone());
    BaseRepository::<Post, i32>::delete(&posts, post.id)
        .await
        .unwrap();

    assert!(comments.list_for_post(post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_entry_requires_matching_author() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    create_user(&db, "fyodor").await;
    let post = create_post(&db, &author, "mine", None).await;
    let posts = SqlPostRepository::new(db);

    assert!(posts.find_entry(post.id, "leo").await.unwrap().is_some());
    assert!(posts.find_entry(post.id, "fyodor").await.unwrap().is_none());
    assert!(posts.find_entry(post.id + 1, "leo").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_keeps_author_and_date() {
    let db = setup_db().await;
    let author = create_user(&db, "leo").await;
    let post = create_post(&db, &author, "draft", None).await;
    let posts = SqlPostRepository::new(db);

    let updated = posts
        .update(post.id, PostDraft::new("final", None, Some("posts/cover.png")).unwrap())
        .await
        .unwrap();

    assert_eq!(updated.text, "final");
    assert_eq!(updated.author_id, author.id);
    assert_eq!(updated.pub_date, post.pub_date);
    assert_eq!(updated.image.as_deref(), Some("posts/cover.png"));
    assert_eq!(posts.count_by_author(author.id).await.unwrap(), 1);

    let missing = posts
        .update(post.id + 100, PostDraft::new("x", None, None).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(missing, RepoError::NotFound));
}
