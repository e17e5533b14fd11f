#![deny(missing_docs)]

//! Core library for the student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Student record types and the in-memory store.
pub mod students;
/// Profile summaries produced by an external generation runtime.
pub mod summarization;
/// Field validation for student payloads.
pub mod validation;
