//! Forwarding to the inference backend.
//!
//! The handler owns the HTTP client and the backend URL. Both are fixed at
//! construction and shared read-only across requests.
//!
//! # Request lifecycle
//! ```text
//! RECEIVED → FORWARDING → AWAITING_BACKEND → NORMALIZING → RESPONDING
//!     any step failing → ProxyFailure (500)
//! ```

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::BackendConfig;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::{normalize, ProxyFailure};

/// Error building a handler from configuration.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid backend url {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Forwards JSON bodies to one backend and normalizes the reply.
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    client: Client,
    backend_url: Url,
}

impl ProxyHandler {
    /// Build a handler for the configured backend.
    pub fn new(config: &BackendConfig) -> Result<Self, HandlerError> {
        let backend_url = Url::parse(&config.url).map_err(|source| HandlerError::Url {
            url: config.url.clone(),
            source,
        })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self::with_client(client, backend_url))
    }

    /// Build a handler around an existing client.
    pub fn with_client(client: Client, backend_url: Url) -> Self {
        Self {
            client,
            backend_url,
        }
    }

    /// Handle one inbound body: parse, forward, decode, normalize.
    ///
    /// The backend must answer with a JSON object; arrays and scalars are
    /// a `ProxyFailure`.
    pub async fn handle(
        &self,
        body: &[u8],
        request_id: Option<&str>,
    ) -> Result<Value, ProxyFailure> {
        let document: Value = serde_json::from_slice(body)?;

        tracing::debug!(
            request_id = request_id.unwrap_or("unknown"),
            backend = %self.backend_url,
            "Forwarding request"
        );

        let mut request = self.client.post(self.backend_url.clone()).json(&document);
        if let Some(id) = request_id {
            request = request.header(X_REQUEST_ID, id);
        }

        let response = request.send().await?;
        let status = response.status();
        let reply: Value = response.json().await?;

        tracing::debug!(
            request_id = request_id.unwrap_or("unknown"),
            status = %status,
            "Backend replied"
        );

        match reply {
            Value::Object(object) => Ok(Value::Object(normalize(object))),
            other => Err(ProxyFailure::new(format!(
                "backend reply is not a JSON object: got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
