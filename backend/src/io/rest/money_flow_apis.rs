//! # REST API for Money Flows

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::CreateMoneyFlowRequest;
use tracing::info;
use uuid::Uuid;

use super::error_response;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/:account_id/money-flows",
            get(list_money_flows).post(create_money_flow),
        )
        .route(
            "/accounts/:account_id/money-flows/:flow_id",
            get(get_money_flow).delete(delete_money_flow),
        )
}

pub async fn create_money_flow(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<CreateMoneyFlowRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{}/money-flows - request: {:?}", account_id, request);

    match state.money_flow_service.create_money_flow(account_id, request).await {
        Ok(flow) => (StatusCode::CREATED, Json(flow)).into_response(),
        Err(e) => error_response("Failed to create money flow", e),
    }
}

pub async fn list_money_flows(State(state): State<AppState>, Path(account_id): Path<Uuid>) -> impl IntoResponse {
    info!("GET /api/accounts/{}/money-flows", account_id);

    match state.money_flow_service.list_money_flows(account_id).await {
        Ok(flows) => (StatusCode::OK, Json(flows)).into_response(),
        Err(e) => error_response("Failed to list money flows", e),
    }
}

pub async fn get_money_flow(
    State(state): State<AppState>,
    Path((account_id, flow_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/money-flows/{}", account_id, flow_id);

    match state.money_flow_service.get_money_flow(account_id, flow_id).await {
        Ok(flow) => (StatusCode::OK, Json(flow)).into_response(),
        Err(e) => error_response("Failed to get money flow", e),
    }
}

pub async fn delete_money_flow(
    State(state): State<AppState>,
    Path((account_id, flow_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    info!("DELETE /api/accounts/{}/money-flows/{}", account_id, flow_id);

    match state.money_flow_service.delete_money_flow(account_id, flow_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Failed to delete money flow", e),
    }
}
