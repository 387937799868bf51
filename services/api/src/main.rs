mod account;
mod classify;
mod error;
mod extractors;
mod posts;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sentinel_common::types::ServiceInfo;
use sentinel_config::{init_tracing, AppConfig};
use sentinel_db::feed::pg_repository::{PgCommentRepository, PgPostRepository};
use sentinel_db::moderation::pg_repository::{
    PgModerationRecordRepository, PgReputationRepository,
};
use sentinel_db::users::pg_repository::PgUserRepository;
use sentinel_moderation::classifiers::{
    LexiconClassifier, RemoteClassifier, RemoteClassifierConfig, UnconfiguredClassifier,
};
use sentinel_moderation::{ClassifierBackend, ModerationConfig, ModerationPipeline};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

type Pipeline = ModerationPipeline<PgReputationRepository, PgModerationRecordRepository>;

#[derive(Clone)]
pub struct AppState {
    pub users: PgUserRepository,
    pub posts: PgPostRepository,
    pub comments: PgCommentRepository,
    pub pipeline: Arc<Pipeline>,
    pub jwt_secret: String,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("sentinel-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP sentinel_up Service up indicator\n\
# TYPE sentinel_up gauge\n\
sentinel_up 1\n\
# HELP sentinel_info Service info\n\
# TYPE sentinel_info gauge\n\
sentinel_info{service=\"sentinel-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(classify::router())
        .merge(posts::router())
        .merge(account::router())
        .layer(cors)
        .with_state(state)
}

fn remote_backend() -> Arc<dyn ClassifierBackend> {
    match RemoteClassifierConfig::from_env() {
        Some(config) => Arc::new(
            RemoteClassifier::new(config).expect("failed to build remote classifier client"),
        ),
        None => {
            tracing::warn!("remote classifier not configured; remote verdicts will degrade");
            Arc::new(UnconfiguredClassifier::remote())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "sentinel-api", "starting");

    let pool = sentinel_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let pipeline = ModerationPipeline::new(
        ModerationConfig::from_env(),
        Arc::new(LexiconClassifier::new()),
        remote_backend(),
        PgReputationRepository::new(pool.clone()),
        Arc::new(PgModerationRecordRepository::new(pool.clone())),
    );

    let state = AppState {
        users: PgUserRepository::new(pool.clone()),
        posts: PgPostRepository::new(pool.clone()),
        comments: PgCommentRepository::new(pool),
        pipeline: Arc::new(pipeline),
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
