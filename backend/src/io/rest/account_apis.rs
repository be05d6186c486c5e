//! # REST API for Accounts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::CreateAccountRequest;
use tracing::info;
use uuid::Uuid;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/accounts/:account_id", get(get_account).post(create_account))
}

/// Create the account of a user
pub async fn create_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{} - request: {:?}", account_id, request);

    match state.account_service.create_account(account_id, request).await {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => error_response("Failed to create account", e),
    }
}

pub async fn get_account(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> impl IntoResponse {
    info!("GET /api/accounts/{}", account_id);

    match state.account_service.get_account(account_id).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => error_response("Failed to get account", e),
    }
}
