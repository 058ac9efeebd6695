//! `common` component group: liveness and instance metadata.
//!
//! GET /health - polled by the discovery registry's health check.
//! GET /info   - what this instance is and which groups it serves.

use axum::{Extension, Json};
use serde::Serialize;

/// Identity of the running instance, fixed at startup.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: String,
    pub instance_id: String,
    pub components: Vec<String>,
    pub version: &'static str,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn info(Extension(info): Extension<ServiceInfo>) -> Json<ServiceInfo> {
    Json(info)
}
