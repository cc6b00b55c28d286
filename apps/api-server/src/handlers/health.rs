//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<u64>,
}

/// Health check endpoint - reports server status and whether the post store answers.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.posts.count().await {
        Ok(count) => HttpResponse::Ok().json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            timestamp,
            posts: Some(count),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach post store");
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
                timestamp,
                posts: None,
            })
        }
    }
}
