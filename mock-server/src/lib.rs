use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

/// What the server saw of a request, returned as the response body of
/// every `/echo/...` route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo/{*path}", any(echo))
        .route("/errors/status", get(error_status))
        .route("/errors/envelope", get(error_envelope))
        .route("/text", get(text))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(request: Request) -> Result<Json<EchoedRequest>, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    tracing::debug!(method = %parts.method, uri = %parts.uri, "echo");
    Ok(Json(EchoedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        content_type: header_value(&parts.headers, header::CONTENT_TYPE),
        authorization: header_value(&parts.headers, header::AUTHORIZATION),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}

async fn error_status() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        [
            ("x-rate-limit-limit", "900"),
            ("x-rate-limit-remaining", "0"),
            ("x-rate-limit-reset", "1700000900"),
        ],
        Json(json!({"errors": [{"code": 187, "message": "Status is a duplicate."}]})),
    )
}

async fn error_envelope() -> Json<serde_json::Value> {
    Json(json!({"errors": [{"code": 34, "message": "Sorry, that page does not exist."}]}))
}

async fn text() -> &'static str {
    "plain text, not json"
}

async fn slow() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({"data": "late"}))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
