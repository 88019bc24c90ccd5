use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{ApiAnalysisResponse, ApiError, ApiRecommendationResponse, ApiUserRequest};
use peer_match::store::CommunityStore;
use peer_match::{analyze_connection_success, now_ms, RecommendationEngine};

#[derive(Clone)]
pub struct AppState {
    pub engine: RecommendationEngine,
    pub store: Arc<CommunityStore>,
}

type ApiRejection = (StatusCode, Json<ApiError>);

pub async fn serve(args: crate::ServeArgs, state: AppState) -> Result<(), String> {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;

    info!(
        %addr,
        data = %state.store.path().display(),
        provider = state.engine.provider_name().unwrap_or("none"),
        "peer-match listening"
    );

    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/peer-recommendations", post(recommendations_handler))
        .route("/api/connections/analyze", post(analyze_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn recommendations_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiUserRequest>,
) -> Result<Json<ApiRecommendationResponse>, ApiRejection> {
    let user_id = request.user_id().map_err(bad_request)?;
    let outcome = state.engine.recommend_for_user(&state.store, &user_id).await;

    Ok(Json(ApiRecommendationResponse {
        success: true,
        recommendations: outcome.recommendations,
        total_evaluated: outcome.total_evaluated,
        timestamp: now_ms(),
    }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiUserRequest>,
) -> Result<Json<ApiAnalysisResponse>, ApiRejection> {
    let user_id = request.user_id().map_err(bad_request)?;
    let connections = state.store.connections_from(&user_id).await;

    Ok(Json(ApiAnalysisResponse {
        success: true,
        analysis: analyze_connection_success(&user_id, &connections),
        timestamp: now_ms(),
    }))
}

fn bad_request(message: String) -> ApiRejection {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message)))
}
