#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use taskboard_server::db;
use tower::ServiceExt;

/// Opens a private in-memory database with the schema applied.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let db = db::connect("sqlite::memory:").await?;
    db::ensure_schema(&db).await?;
    Ok(db)
}

/// Builds the application router on top of a fresh in-memory database.
pub async fn setup_app() -> anyhow::Result<(Router, Arc<DatabaseConnection>)> {
    let db = Arc::new(setup_db().await?);
    let app = taskboard_server::web::create_app(db.clone());
    Ok((app, db))
}

/// Sends a request with an optional JSON body and returns the status and parsed JSON body.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
