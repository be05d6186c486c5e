//! # REST API for Categories

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{CategoryType, CreateCategoryRequest};
use tracing::info;
use uuid::Uuid;

use super::error_response;
use crate::domain::ServiceError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/:account_id/categories",
            get(list_categories).post(create_category),
        )
        .route("/accounts/:account_id/categories/:category_id", get(get_category))
}

// Query parameters for category listing API
#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    /// `income` or `expense`; all categories when absent
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

pub async fn create_category(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/accounts/{}/categories - request: {:?}", account_id, request);

    match state.category_service.create_category(account_id, request).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => error_response("Failed to create category", e),
    }
}

pub async fn get_category(
    State(state): State<AppState>,
    Path((account_id, category_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/categories/{}", account_id, category_id);

    match state.category_service.get_category(account_id, category_id).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => error_response("Failed to get category", e),
    }
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<CategoryListQuery>,
) -> impl IntoResponse {
    info!("GET /api/accounts/{}/categories - query: {:?}", account_id, query);

    let category_type = match query.category_type.as_deref().map(str::parse::<CategoryType>).transpose() {
        Ok(category_type) => category_type,
        Err(message) => return error_response("Invalid category query", ServiceError::InvalidRequest(message)),
    };

    match state.category_service.list_categories(account_id, category_type).await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => error_response("Failed to list categories", e),
    }
}
