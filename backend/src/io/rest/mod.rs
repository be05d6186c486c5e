//! # REST API Interface Layer
//!
//! HTTP endpoints under `/api`. Every resource hangs off
//! `/api/accounts/:account_id`; the account id in the path stands in for the
//! authenticated user.
//!
//! Service errors map onto status codes as follows:
//!
//! | error                          | status |
//! |--------------------------------|--------|
//! | validation, invalid request    | 400    |
//! | forbidden                      | 403    |
//! | not found                      | 404    |
//! | already exists                 | 409    |
//! | store failure                  | 500    |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::domain::ServiceError;

pub mod account_apis;
pub mod account_entry_apis;
pub mod category_apis;
pub mod money_flow_apis;

pub fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Validation(_) | ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::AlreadyExists(_) => StatusCode::CONFLICT,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Log a failed request and turn its error into a response
pub fn error_response(context: &str, err: ServiceError) -> Response {
    let status = status_for(&err);

    if status.is_server_error() {
        error!("{}: {:?}", context, err);
        (status, "Internal server error").into_response()
    } else {
        warn!("{}: {}", context, err);
        (status, err.to_string()).into_response()
    }
}
