use axum::extract::State;
use axum::Json;

use sentinel_common::error::SentinelError;
use sentinel_db::users::repositories::UserRepository;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::AppState;

use super::responses::MeResponse;

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .users
        .get_by_id(auth.user_id)
        .await?
        .ok_or_else(|| SentinelError::NotFound("user not found".to_string()))?;

    let account = state.pipeline.reputation(auth.user_id).await?;

    Ok(Json(MeResponse::new(user, &account)))
}
