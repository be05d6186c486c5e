use chrono::NaiveDate;
use uuid::Uuid;

use crate::storage::{ConflictAware, StoreError};

/// Validation failures raised by the domain model.
///
/// These are surfaced to the caller as-is and are never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Transaction amount must not be zero")]
    ZeroAmount,
    #[error("Can not use non-expense category for expense transaction")]
    ExpenseCategoryRequired,
    #[error("Can not use non-income category for income transaction")]
    IncomeCategoryRequired,
    #[error("Category name must be between 1 and {max} characters, got {length}")]
    CategoryNameLength { length: usize, max: usize },
    #[error("Unsupported amount of days for a period: {0}")]
    UnsupportedPeriod(i32),
    #[error("Starting date {starting_date} is too early, the earliest allowed is {earliest}")]
    StartsTooEarly {
        starting_date: NaiveDate,
        earliest: NaiveDate,
    },
    #[error("Last checked date {last_checked} is before starting date {starting_date}")]
    CheckedBeforeStart {
        starting_date: NaiveDate,
        last_checked: NaiveDate,
    },
    #[error("Last checked date {last_checked} is after the current date {today}")]
    CheckedInFuture {
        last_checked: NaiveDate,
        today: NaiveDate,
    },
    #[error("Impossible last checked date {last_checked} for a {period_days}-day period starting {starting_date}")]
    OffCadence {
        starting_date: NaiveDate,
        last_checked: NaiveDate,
        period_days: i32,
    },
    #[error("Entry date {date} is after the current date {today}")]
    EntryInFuture { date: NaiveDate, today: NaiveDate },
    #[error("Account {actual} does not own this record, expected account {expected}")]
    AccountMismatch { expected: Uuid, actual: Uuid },
    #[error("Category reference {expected:?} does not match given category {actual:?}")]
    CategoryMismatch {
        expected: Option<Uuid>,
        actual: Option<Uuid>,
    },
}

/// Errors returned by the CRUD services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Access to {0} is forbidden")]
    Forbidden(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Store(StoreError::from(err))
    }
}

impl ConflictAware for ServiceError {
    fn is_conflict(&self) -> bool {
        matches!(self, ServiceError::Store(err) if err.is_conflict())
    }
}
