//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID + trace layers)
//!     → forward.rs (parse body, POST to backend, decode reply)
//!     → response.rs (normalize `response`, or render ProxyFailure as 500)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::ProxyHandler;
pub use request::X_REQUEST_ID;
pub use response::{normalize, ProxyFailure};
pub use server::{HttpServer, ServerError};
