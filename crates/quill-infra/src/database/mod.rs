//! Relational storage via SeaORM.

mod base;
mod connections;
pub mod entity;
mod repositories;

pub use base::SeaOrmRepository;
pub use connections::{DatabaseConfig, connect};
pub use repositories::{
    SqlCommentRepository, SqlFollowRepository, SqlGroupRepository, SqlPostRepository,
    SqlUserRepository,
};

#[cfg(test)]
mod tests;
