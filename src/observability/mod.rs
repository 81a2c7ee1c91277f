//! Observability subsystem.
//!
//! Structured logs via `tracing`. Each HTTP request runs inside a
//! `tower_http` trace span, and its `x-request-id` is attached to the
//! handler's log events and the backend call.

pub mod logging;

pub use logging::init_logging;
