#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::MethodRouter, routing::post};
use serde_json::json;
use tokio::net::TcpListener;

use momo_gateway::config::{Credentials, HttpConfig};
use momo_gateway::infrastructure::http_client;

pub const CALLBACK_URL: &str = "https://merchant.test/callback";

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_provider(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn credentials(base_url: &str) -> Arc<Credentials> {
    Arc::new(Credentials {
        consumer_key: "key".to_string(),
        consumer_secret: "secret".to_string(),
        token_url: format!("{base_url}/oauth/token"),
        callback_url: CALLBACK_URL.to_string(),
        api_endpoint: format!("{base_url}/payment"),
    })
}

pub fn http_client_with_timeout(timeout: Duration) -> reqwest::Client {
    http_client::build(&HttpConfig {
        connect_timeout: Duration::from_secs(1),
        timeout,
    })
    .unwrap()
}

pub fn http_client() -> reqwest::Client {
    http_client_with_timeout(Duration::from_secs(5))
}

/// Token endpoint that always grants `token` and counts its calls
pub fn token_ok(token: &'static str, calls: Arc<AtomicUsize>) -> MethodRouter {
    post(move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600
        }))
    })
}

/// Token endpoint that always answers `status` with a raw body
pub fn token_failing(status: StatusCode, body: &'static str) -> MethodRouter {
    post(move || async move { (status, body.to_string()) })
}
