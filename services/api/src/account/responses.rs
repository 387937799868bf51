use serde::Serialize;
use uuid::Uuid;

use sentinel_db::moderation::models::{AccountStatus, ReputationAccount};
use sentinel_db::users::models::User;

/// The caller's profile plus their current reputation snapshot.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub reputation_score: i32,
    pub flagged_count: i32,
    pub status: String,
    pub restricted: bool,
}

impl MeResponse {
    pub fn new(user: User, account: &ReputationAccount) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            reputation_score: account.score,
            flagged_count: account.flagged_count,
            status: account.status.as_str().to_string(),
            restricted: account.status == AccountStatus::Restricted,
        }
    }
}
