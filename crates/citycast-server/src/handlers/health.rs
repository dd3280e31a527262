//! Health check and landing endpoints

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Landing response listing the public endpoints
#[derive(Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub endpoints: [&'static str; 2],
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: "citycast",
        endpoints: ["/autocomplete?q=<text>", "/search?city=<text>"],
    })
}
