//! Ollama response-normalizing reverse proxy.
//!
//! Accepts `POST /` with any JSON body, forwards it to a single inference
//! backend, and returns the backend's JSON with a list-valued `response`
//! field collapsed to its first element.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
