//! SeaORM repository implementations.

mod comment;
mod follow;
mod group;
mod post;
mod user;

use super::base::SeaOrmRepository;
use super::entity;

pub type SqlUserRepository = SeaOrmRepository<entity::user::Entity>;
pub type SqlGroupRepository = SeaOrmRepository<entity::group::Entity>;
pub type SqlPostRepository = SeaOrmRepository<entity::post::Entity>;
pub type SqlCommentRepository = SeaOrmRepository<entity::comment::Entity>;
pub type SqlFollowRepository = SeaOrmRepository<entity::follow::Entity>;
