use async_trait::async_trait;
use uuid::Uuid;

use crate::feed::models::{Comment, NewComment, NewPost, Post};
use sentinel_common::error::SentinelResult;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: NewPost) -> SentinelResult<Post>;
    async fn get_by_id(&self, id: Uuid) -> SentinelResult<Option<Post>>;

    /// Feed listing, newest first.
    async fn list(&self) -> SentinelResult<Vec<Post>>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: NewComment) -> SentinelResult<Comment>;
    async fn get_by_id(&self, post_id: Uuid, id: Uuid) -> SentinelResult<Option<Comment>>;
    async fn list_for_post(&self, post_id: Uuid) -> SentinelResult<Vec<Comment>>;
    async fn delete(&self, post_id: Uuid, id: Uuid) -> SentinelResult<()>;
}
