//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use ollama_proxy::{HttpServer, ProxyConfig, Shutdown};

/// Serve `app` on an ephemeral loopback port.
pub async fn start_backend(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Backend that answers every POST with the same JSON document.
pub async fn start_json_backend(reply: Value) -> SocketAddr {
    let app = Router::new().route(
        "/",
        post(move || {
            let reply = reply.clone();
            async move { Json(reply) }
        }),
    );
    start_backend(app).await
}

/// Backend that answers every POST with a raw body and status.
pub async fn start_raw_backend(status: StatusCode, body: &'static str) -> SocketAddr {
    let app = Router::new().route("/", post(move || async move { (status, body) }));
    start_backend(app).await
}

/// Requests seen by a recording backend.
#[derive(Clone, Default)]
pub struct Recorded {
    inner: Arc<Mutex<Vec<(HeaderMap, Bytes)>>>,
}

impl Recorded {
    pub fn take(&self) -> Vec<(HeaderMap, Bytes)> {
        std::mem::take(&mut *self.inner.lock().unwrap())
    }
}

/// Backend that echoes the request body back and records what it received.
pub async fn start_echo_backend() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let sink = recorded.clone();
    let app = Router::new().route(
        "/",
        post(move |headers: HeaderMap, body: Bytes| {
            let sink = sink.clone();
            async move {
                sink.inner.lock().unwrap().push((headers, body.clone()));
                ([("content-type", "application/json")], body)
            }
        }),
    );
    (start_backend(app).await, recorded)
}

/// An address nothing listens on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy and the handle that stops it.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy in front of `backend_url` with default settings.
pub async fn start_proxy(backend_url: String) -> TestProxy {
    let mut config = ProxyConfig::default();
    config.backend.url = backend_url;
    start_proxy_with(config).await
}

/// Start the proxy with `config`; the listen address is replaced by an ephemeral port.
pub async fn start_proxy_with(mut config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
