//! Demo application handlers.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

use crate::app_state::AppState;

/// Static page; renders fast.
pub async fn test(State(state): State<AppState>) -> impl IntoResponse {
    Html(format!(
        "<!doctype html><title>{0}</title><h1>{0}</h1>",
        state.cfg().app.name
    ))
}

pub async fn show_user(Path(id): Path<String>) -> impl IntoResponse {
    Json(json!({ "id": id }))
}
