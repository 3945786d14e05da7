use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use quill_core::domain::{Group, NewGroup};
use quill_core::error::RepoError;
use quill_core::ports::GroupRepository;

use super::SqlGroupRepository;
use crate::database::base::repo_err;
use crate::database::entity::group;

#[async_trait]
impl GroupRepository for SqlGroupRepository {
    async fn create(&self, new_group: NewGroup) -> Result<Group, RepoError> {
        let model = group::ActiveModel {
            title: Set(new_group.title),
            slug: Set(new_group.slug),
            description: Set(new_group.description),
            ..Default::default()
        }
        .insert(self.conn())
        .await
        .map_err(repo_err)?;

        tracing::info!(group_id = model.id, slug = %model.slug, "Group created");
        Ok(model.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = group::Entity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let groups = group::Entity::find()
            .order_by_asc(group::Column::Title)
            .all(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(groups.into_iter().map(Into::into).collect())
    }
}
