use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::UserRepository;

use super::SqlUserRepository;
use crate::database::base::repo_err;
use crate::database::entity::user;

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn create(&self, new_user: User) -> Result<User, RepoError> {
        tracing::debug!(username = %new_user.username, "Creating user");

        let active: user::ActiveModel = new_user.into();
        let model = active.insert(self.conn()).await.map_err(repo_err)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }
}
