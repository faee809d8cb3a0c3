//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness (never in the route table, so never timed)

use axum::{http::StatusCode, response::IntoResponse};

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
