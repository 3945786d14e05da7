use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use quill_core::domain::{
    AuthorSummary, FeedScope, GroupSummary, Page, PageRequest, Post, PostDraft, PostEntry,
};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::SqlPostRepository;
use crate::database::base::repo_err;
use crate::database::entity::{follow, group, post, user};

/// A post row joined with its author and optional group.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: i32,
    text: String,
    pub_date: DateTimeWithTimeZone,
    author_id: Uuid,
    group_id: Option<i32>,
    image: Option<String>,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    group_slug: Option<String>,
    group_title: Option<String>,
}

impl From<PostRow> for PostEntry {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_slug, row.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupSummary { id, slug, title }),
            _ => None,
        };

        Self {
            author: AuthorSummary::new(
                row.author_id,
                row.author_username,
                &row.author_first_name,
                &row.author_last_name,
            ),
            group,
            post: Post {
                id: row.id,
                text: row.text,
                pub_date: row.pub_date.into(),
                author_id: row.author_id,
                group_id: row.group_id,
                image: row.image,
            },
        }
    }
}

fn entry_select() -> Select<post::Entity> {
    post::Entity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::Text,
            post::Column::PubDate,
            post::Column::AuthorId,
            post::Column::GroupId,
            post::Column::Image,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(user::Column::FirstName, "author_first_name")
        .column_as(user::Column::LastName, "author_last_name")
        .column_as(group::Column::Slug, "group_slug")
        .column_as(group::Column::Title, "group_title")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Group.def())
}

fn scoped(select: Select<post::Entity>, scope: FeedScope) -> Select<post::Entity> {
    match scope {
        FeedScope::All => select,
        FeedScope::Group(group_id) => select.filter(post::Column::GroupId.eq(group_id)),
        FeedScope::Author(author_id) => select.filter(post::Column::AuthorId.eq(author_id)),
        FeedScope::FollowedBy(user_id) => select.filter(
            post::Column::AuthorId.in_subquery(
                Query::select()
                    .column(follow::Column::AuthorId)
                    .from(follow::Entity)
                    .and_where(follow::Column::UserId.eq(user_id))
                    .to_owned(),
            ),
        ),
    }
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn create(&self, author_id: Uuid, draft: PostDraft) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            text: Set(draft.text),
            pub_date: Set(Utc::now().into()),
            author_id: Set(author_id),
            group_id: Set(draft.group_id),
            image: Set(draft.image),
            ..Default::default()
        }
        .insert(self.conn())
        .await
        .map_err(repo_err)?;

        tracing::info!(post_id = model.id, author_id = %author_id, "Post created");
        Ok(model.into())
    }

    async fn update(&self, post_id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let existing = post::Entity::find_by_id(post_id)
            .one(self.conn())
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = existing.into_active_model();
        active.text = Set(draft.text);
        active.group_id = Set(draft.group_id);
        active.image = Set(draft.image);

        let model = active.update(self.conn()).await.map_err(repo_err)?;
        tracing::info!(post_id = model.id, "Post updated");

        Ok(model.into())
    }

    async fn find_entry(
        &self,
        post_id: i32,
        username: &str,
    ) -> Result<Option<PostEntry>, RepoError> {
        let row = entry_select()
            .filter(post::Column::Id.eq(post_id))
            .filter(user::Column::Username.eq(username))
            .into_model::<PostRow>()
            .one(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(row.map(Into::into))
    }

    async fn feed(
        &self,
        scope: FeedScope,
        page: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let paginator = scoped(entry_select(), scope)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .into_model::<PostRow>()
            .paginate(self.conn(), page.size);

        let totals = paginator.num_items_and_pages().await.map_err(repo_err)?;
        let number = page.resolve(totals.number_of_pages);
        let rows = paginator.fetch_page(number - 1).await.map_err(repo_err)?;

        tracing::debug!(
            ?scope,
            page = number,
            total = totals.number_of_items,
            "Feed page loaded"
        );

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            number,
            totals.number_of_pages,
            totals.number_of_items,
        ))
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        post::Entity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(self.conn())
            .await
            .map_err(repo_err)
    }
}
