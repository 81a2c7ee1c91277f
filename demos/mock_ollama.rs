//! Stand-in Ollama backend for trying the proxy by hand.
//!
//! Replies to `POST /` with a list-valued `response` every other request,
//! the shape the proxy exists to normalize.
//!
//! ```text
//! cargo run --example mock_ollama
//! cargo run -- --backend http://127.0.0.1:11434
//! curl -s localhost:8080 -d '{"model":"llama3","prompt":"hi"}'
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let counter = Arc::new(AtomicU64::new(0));
    let app = Router::new()
        .route("/", post(generate))
        .with_state(counter);

    let addr = SocketAddr::from(([127, 0, 0, 1], 11434));
    println!("Mock Ollama listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn generate(State(counter): State<Arc<AtomicU64>>, Json(request): Json<Value>) -> Json<Value> {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let model = request.get("model").cloned().unwrap_or(Value::Null);
    let text = format!("reply #{n}");

    let response = if n % 2 == 0 {
        json!([text, "ignored tail"])
    } else {
        json!(text)
    };

    Json(json!({ "model": model, "response": response, "done": true }))
}
