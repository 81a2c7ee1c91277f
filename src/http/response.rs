//! Backend response normalization and client-facing failure shape.
//!
//! Ollama sometimes answers with `"response": [...]` where clients expect a
//! single value. The proxy collapses such a list to its head (or `{}` when
//! empty) and leaves every other field alone.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

/// Key whose list value gets collapsed.
const RESPONSE_KEY: &str = "response";

/// Collapse a list-valued `response` field to its first element.
///
/// A missing key and non-list values pass through unchanged.
pub fn normalize(mut object: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Array(items)) = object.get_mut(RESPONSE_KEY) {
        let head = if items.is_empty() {
            Value::Object(Map::new())
        } else {
            items.swap_remove(0)
        };
        object.insert(RESPONSE_KEY.to_string(), head);
    }
    object
}

/// Any failure while forwarding a request or decoding the backend's reply.
///
/// Network errors, timeouts and malformed JSON all land here; the client
/// only ever sees a 500 with the rendered message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProxyFailure {
    message: String,
}

impl ProxyFailure {
    /// Failure with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            return Self {
                message: "proxy failure".to_string(),
            };
        }
        Self { message }
    }

    /// Render an error and its source chain into one message.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        if message.is_empty() {
            message.push_str("proxy failure");
        }
        Self { message }
    }

    /// The text sent to the client under `error`.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ProxyFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::from_error(&err)
    }
}

impl From<serde_json::Error> for ProxyFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::from_error(&err)
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(document: Value) -> Value {
        match document {
            Value::Object(object) => Value::Object(normalize(object)),
            other => panic!("test document must be an object, got {other}"),
        }
    }

    #[test]
    fn list_collapses_to_head() {
        let out = normalized(json!({"response": ["a", "b"], "done": true}));
        assert_eq!(out, json!({"response": "a", "done": true}));
    }

    #[test]
    fn empty_list_becomes_empty_object() {
        assert_eq!(normalized(json!({"response": []})), json!({"response": {}}));
    }

    #[test]
    fn head_keeps_its_type() {
        let out = normalized(json!({"response": [{"text": "hi"}, 2]}));
        assert_eq!(out, json!({"response": {"text": "hi"}}));

        let out = normalized(json!({"response": [[1, 2], [3]]}));
        assert_eq!(out, json!({"response": [1, 2]}));

        let out = normalized(json!({"response": [null]}));
        assert_eq!(out, json!({"response": null}));
    }

    #[test]
    fn non_list_response_untouched() {
        assert_eq!(
            normalized(json!({"response": "hello"})),
            json!({"response": "hello"})
        );
        assert_eq!(normalized(json!({"response": 3})), json!({"response": 3}));
    }

    #[test]
    fn missing_key_untouched() {
        assert_eq!(normalized(json!({"foo": 1})), json!({"foo": 1}));
    }

    #[test]
    fn nested_response_keys_untouched() {
        let doc = json!({"message": {"response": ["x"]}});
        assert_eq!(normalized(doc.clone()), doc);
    }

    #[test]
    fn empty_message_gets_placeholder() {
        assert_eq!(ProxyFailure::new("").message(), "proxy failure");
        assert_eq!(ProxyFailure::new("bad").message(), "bad");
    }

    #[test]
    fn failure_message_includes_json_error() {
        let err = serde_json::from_str::<Value>("not json").unwrap_err();
        let failure = ProxyFailure::from(err);
        assert!(!failure.message().is_empty());
        assert!(failure.message().contains("expected"));
    }

    #[test]
    fn failure_renders_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::other("connection refused"));
        let failure = ProxyFailure::from_error(&err);
        assert_eq!(failure.message(), "outer: connection refused");
    }

    #[tokio::test]
    async fn failure_is_500_with_error_key() {
        let failure = ProxyFailure::from_error(&std::io::Error::other("boom"));
        let response = failure.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "boom"}));
    }
}
