use async_trait::async_trait;
use uuid::Uuid;

use crate::users::models::User;
use sentinel_common::error::SentinelResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> SentinelResult<Option<User>>;
    async fn create(&self, user: User) -> SentinelResult<User>;
}
