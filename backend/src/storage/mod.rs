//! # Storage
//!
//! SQLite persistence: the connection pool and schema, typed repositories,
//! record/domain mappers and the transactional executor every unit of work
//! runs through.

pub mod connection;
pub mod error;
pub mod executor;
pub mod mappers;
pub mod repositories;

pub use connection::DbConnection;
pub use error::{is_conflict_code, ConflictAware, StoreError};
pub use executor::{RetryPolicy, TransactionalExecutor, DEFAULT_RETRY_ATTEMPTS};
