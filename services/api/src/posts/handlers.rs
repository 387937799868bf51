use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use sentinel_common::error::SentinelError;
use sentinel_db::feed::models::{NewComment, NewPost};
use sentinel_db::feed::repositories::{CommentRepository, PostRepository};

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::AppState;

use super::requests::{CreateCommentRequest, CreatePostRequest};
use super::responses::{
    CommentsResponse, CreatedCommentResponse, CreatedPostResponse, MutationResponse, PostsResponse,
};

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostsResponse>, ApiError> {
    let data = state.posts.list().await?;
    let count = data.len();
    Ok(Json(PostsResponse { data, count }))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<CreatedPostResponse>), ApiError> {
    let post_id = Uuid::new_v4();
    let verdict = state
        .pipeline
        .moderate(post_id, auth.user_id, &body.content)
        .await?;

    let post = state
        .posts
        .create(NewPost {
            id: post_id,
            author_id: auth.user_id,
            content: body.content,
            image_url: body.image_url,
            is_bullying: verdict.is_bullying,
            category: Some(verdict.category),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedPostResponse::new(post, &verdict)),
    ))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<CommentsResponse>, ApiError> {
    state
        .posts
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| SentinelError::NotFound(format!("post not found: {post_id}")))?;

    let data = state.comments.list_for_post(post_id).await?;
    let count = data.len();
    Ok(Json(CommentsResponse { data, count }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    auth: AuthUser,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CreatedCommentResponse>), ApiError> {
    state
        .posts
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| SentinelError::NotFound(format!("post not found: {post_id}")))?;

    let comment_id = Uuid::new_v4();
    let verdict = state
        .pipeline
        .moderate(comment_id, auth.user_id, &body.content)
        .await?;

    let comment = state
        .comments
        .create(NewComment {
            id: comment_id,
            post_id,
            author_id: auth.user_id,
            content: body.content,
            is_bullying: verdict.is_bullying,
            category: Some(verdict.category),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedCommentResponse::new(comment, &verdict)),
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
    auth: AuthUser,
) -> Result<Json<MutationResponse>, ApiError> {
    let comment = state
        .comments
        .get_by_id(post_id, comment_id)
        .await?
        .ok_or_else(|| SentinelError::NotFound(format!("comment not found: {comment_id}")))?;

    if comment.author_id != auth.user_id {
        return Err(ApiError(SentinelError::Forbidden(
            "only the comment's author may delete it".to_string(),
        )));
    }

    state.comments.delete(post_id, comment_id).await?;
    Ok(Json(MutationResponse { ok: true }))
}
