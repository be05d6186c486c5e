//! # REST API for Account Entries
//!
//! Manual ledger entries. Entries produced by the money flow scheduler are
//! listed, replaced and deleted through the same endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{AccountEntryFilter, CreateAccountEntryRequest};
use tracing::info;
use uuid::Uuid;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/:account_id/entries", get(list_entries).post(create_entry))
        .route(
            "/accounts/:account_id/entries/:entry_id",
            get(get_entry).put(replace_entry).delete(delete_entry),
        )
}

pub async fn create_entry(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<CreateAccountEntryRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{}/entries - request: {:?}", account_id, request);

    match state.account_entry_service.create_entry(account_id, request).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => error_response("Failed to create entry", e),
    }
}

/// List entries, optionally by `start_date`, `end_date` and `category_id`
pub async fn list_entries(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(filter): Query<AccountEntryFilter>,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/entries - query: {:?}", account_id, filter);

    match state.account_entry_service.list_entries(account_id, filter).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => error_response("Failed to list entries", e),
    }
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path((account_id, entry_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/entries/{}", account_id, entry_id);

    match state.account_entry_service.get_entry(account_id, entry_id).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => error_response("Failed to get entry", e),
    }
}

pub async fn replace_entry(
    State(state): State<AppState>,
    Path((account_id, entry_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateAccountEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/accounts/{}/entries/{} - request: {:?}", account_id, entry_id, request);

    match state.account_entry_service.replace_entry(account_id, entry_id, request).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => error_response("Failed to replace entry", e),
    }
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path((account_id, entry_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    info!("DELETE /api/accounts/{}/entries/{}", account_id, entry_id);

    match state.account_entry_service.delete_entry(account_id, entry_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete entry", e),
    }
}
