use axum::extract::State;
use axum::Json;

use sentinel_db::moderation::models::Category;
use sentinel_moderation::ClassifierSource;

use crate::error::ApiError;
use crate::AppState;

use super::requests::ClassifyRequest;
use super::responses::{
    CategoriesResponse, CategoryInfo, ClassificationResponse, SingleClassifierResponse,
};

/// Dual classification without persistence or reputation effects.
pub async fn classify_text(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let outcome = state.pipeline.classify_only(&body.text).await?;
    Ok(Json(ClassificationResponse::from_outcome(
        body.text.trim(),
        &outcome,
    )))
}

pub async fn classify_local(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<SingleClassifierResponse>, ApiError> {
    let verdict = state
        .pipeline
        .classify_single(ClassifierSource::Local, &body.text)
        .await?;
    Ok(Json(SingleClassifierResponse::from_verdict(
        body.text.trim(),
        &verdict,
    )))
}

pub async fn classify_remote(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<SingleClassifierResponse>, ApiError> {
    let verdict = state
        .pipeline
        .classify_single(ClassifierSource::Remote, &body.text)
        .await?;
    Ok(Json(SingleClassifierResponse::from_verdict(
        body.text.trim(),
        &verdict,
    )))
}

pub async fn list_categories() -> Json<CategoriesResponse> {
    let categories = Category::ALL
        .iter()
        .map(|category| CategoryInfo {
            name: category.as_str().to_string(),
            description: category.description().to_string(),
        })
        .collect();
    Json(CategoriesResponse { categories })
}
