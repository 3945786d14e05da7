use async_trait::async_trait;
use sea_orm::prelude::Uuid;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

use quill_core::domain::{Follow, FollowStats};
use quill_core::error::RepoError;
use quill_core::ports::FollowRepository;

use super::SqlFollowRepository;
use crate::database::base::repo_err;
use crate::database::entity::follow;

#[async_trait]
impl FollowRepository for SqlFollowRepository {
    async fn follow(&self, edge: Follow) -> Result<bool, RepoError> {
        let active = follow::ActiveModel {
            user_id: Set(edge.user_id),
            author_id: Set(edge.author_id),
            ..Default::default()
        };

        let result = follow::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn())
            .await;

        let created = match result {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(repo_err(e)),
        };

        tracing::debug!(
            user_id = %edge.user_id,
            author_id = %edge.author_id,
            created,
            "Follow stored"
        );
        Ok(created)
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = follow::Entity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let count = follow::Entity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .count(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn stats(&self, user_id: Uuid) -> Result<FollowStats, RepoError> {
        let followers = follow::Entity::find()
            .filter(follow::Column::AuthorId.eq(user_id))
            .count(self.conn())
            .await
            .map_err(repo_err)?;
        let following = follow::Entity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .count(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(FollowStats {
            followers,
            following,
        })
    }
}
