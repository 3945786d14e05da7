use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed subscription edge: `user` reads `author`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}

/// What a follow request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDecision {
    /// Store the edge (a no-op if it already exists).
    Store(Follow),
    /// Users cannot subscribe to themselves.
    SelfFollow,
}

impl Follow {
    /// Decide whether `user_id` may follow `author_id`.
    ///
    /// The storage layer has no self-follow constraint, so this check is the
    /// only thing keeping such edges out.
    pub fn decide(user_id: Uuid, author_id: Uuid) -> FollowDecision {
        if user_id == author_id {
            FollowDecision::SelfFollow
        } else {
            FollowDecision::Store(Follow { user_id, author_id })
        }
    }
}

/// Follower/following counters for a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FollowStats {
    pub followers: u64,
    pub following: u64,
}
