//! # Domain
//!
//! Validated domain model, entry generation for due money flows, and the
//! CRUD services the REST layer calls into.

pub mod account_entry_service;
pub mod account_service;
pub mod category_service;
pub mod entry_generation;
pub mod error;
pub mod models;
pub mod money_flow_service;

pub use account_entry_service::AccountEntryService;
pub use account_service::AccountService;
pub use category_service::CategoryService;
pub use entry_generation::{generate_next_entries, generate_next_entry, GeneratedEntry};
pub use error::{DomainError, ServiceError};
pub use money_flow_service::MoneyFlowService;
