//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services. Handlers
//! translate requests into service calls and service errors into HTTP
//! status codes; no business rules live here.

pub mod rest;
