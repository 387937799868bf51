use serde::Serialize;

use sentinel_db::feed::models::{Comment, Post};
use sentinel_db::moderation::models::AggregatedVerdict;

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub data: Vec<Post>,
    pub count: usize,
}

/// A freshly created post together with the verdict fields the caller
/// needs to surface a warning.
#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    #[serde(flatten)]
    pub post: Post,
    pub explanation: Option<String>,
    pub disagreement: bool,
    pub degraded: bool,
}

impl CreatedPostResponse {
    pub fn new(post: Post, verdict: &AggregatedVerdict) -> Self {
        Self {
            post,
            explanation: verdict.explanation.clone(),
            disagreement: verdict.disagreement,
            degraded: verdict.degraded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub data: Vec<Comment>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CreatedCommentResponse {
    #[serde(flatten)]
    pub comment: Comment,
    pub explanation: Option<String>,
    pub disagreement: bool,
    pub degraded: bool,
}

impl CreatedCommentResponse {
    pub fn new(comment: Comment, verdict: &AggregatedVerdict) -> Self {
        Self {
            comment,
            explanation: verdict.explanation.clone(),
            disagreement: verdict.disagreement,
            degraded: verdict.degraded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub ok: bool,
}
