use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use quill_core::domain::{AuthorSummary, Comment, CommentDraft, CommentEntry};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

use super::SqlCommentRepository;
use crate::database::base::repo_err;
use crate::database::entity::{comment, user};

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: i32,
    post_id: i32,
    author_id: Uuid,
    text: String,
    created: DateTimeWithTimeZone,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
}

impl From<CommentRow> for CommentEntry {
    fn from(row: CommentRow) -> Self {
        Self {
            author: AuthorSummary::new(
                row.author_id,
                row.author_username,
                &row.author_first_name,
                &row.author_last_name,
            ),
            comment: Comment {
                id: row.id,
                post_id: row.post_id,
                author_id: row.author_id,
                text: row.text,
                created: row.created.into(),
            },
        }
    }
}

#[async_trait]
impl CommentRepository for SqlCommentRepository {
    async fn create(
        &self,
        post_id: i32,
        author_id: Uuid,
        draft: CommentDraft,
    ) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            post_id: Set(post_id),
            author_id: Set(author_id),
            text: Set(draft.text),
            created: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(self.conn())
        .await
        .map_err(repo_err)?;

        tracing::info!(comment_id = model.id, post_id, "Comment created");
        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentEntry>, RepoError> {
        let rows = comment::Entity::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::PostId,
                comment::Column::AuthorId,
                comment::Column::Text,
                comment::Column::Created,
            ])
            .column_as(user::Column::Username, "author_username")
            .column_as(user::Column::FirstName, "author_first_name")
            .column_as(user::Column::LastName, "author_last_name")
            .join(JoinType::InnerJoin, comment::Relation::Author.def())
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::Created)
            .order_by_desc(comment::Column::Id)
            .into_model::<CommentRow>()
            .all(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
