//! # Budget Tracker Backend
//!
//! Accounts, categories and ledger entries behind a REST API, plus a
//! scheduler that turns recurring money flows into ledger entries.
//!
//! ## Architecture
//!
//! - **domain**: validated model, entry generation and CRUD services
//! - **storage**: SQLite pool, repositories, mappers and the transactional
//!   executor that retries conflicting units of work
//! - **jobs**: the periodic job host and the money flow job
//! - **io**: axum REST handlers
//!
//! Every read and write goes through [`storage::TransactionalExecutor`], which
//! is what makes it safe to run several scheduler instances against one
//! database.

use axum::{
    http::Method,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod clock;
pub mod config;
pub mod domain;
pub mod io;
pub mod jobs;
pub mod storage;

use clock::Clock;
use domain::{AccountEntryService, AccountService, CategoryService, MoneyFlowService};
use io::rest::{account_apis, account_entry_apis, category_apis, money_flow_apis};
use storage::{DbConnection, RetryPolicy, TransactionalExecutor};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub category_service: CategoryService,
    pub account_entry_service: AccountEntryService,
    pub money_flow_service: MoneyFlowService,
}

impl AppState {
    pub fn new(executor: TransactionalExecutor, clock: Arc<dyn Clock>) -> Self {
        Self {
            account_service: AccountService::new(executor.clone()),
            category_service: CategoryService::new(executor.clone()),
            account_entry_service: AccountEntryService::new(executor.clone(), clock.clone()),
            money_flow_service: MoneyFlowService::new(executor, clock),
        }
    }
}

/// Open the database and build the executor every service shares
pub async fn initialize_backend(database_url: &str, retry: RetryPolicy) -> anyhow::Result<TransactionalExecutor> {
    info!("Setting up database");
    let db = DbConnection::new(database_url).await?;

    let executor = TransactionalExecutor::new(db, retry);
    info!(
        "Transactions retry up to {} times on conflict",
        executor.retry_policy().max_attempts()
    );
    Ok(executor)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(account_apis::router())
        .merge(category_apis::router())
        .merge(account_entry_apis::router())
        .merge(money_flow_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}
