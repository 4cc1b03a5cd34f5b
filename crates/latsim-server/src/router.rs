//! Axum router wiring.
//!
//! The simulated routes and the not-found fallback sit behind the request
//! interceptor. The operational routes are merged afterwards so scrapes are
//! not counted, or live on their own listener when `metrics.listen` is set.

use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::{app_state::AppState, obs, ops, simulate};

/// Router for the main listener.
pub fn build_router(state: AppState) -> Router {
    let app = instrument(simulated_routes(), &state);
    let app = if state.cfg().metrics.listen.is_none() {
        app.merge(ops_routes(&state.cfg().metrics.path))
    } else {
        app
    };
    app.with_state(state)
}

/// Router for the dedicated metrics listener.
pub fn build_metrics_router(state: AppState) -> Router {
    ops_routes(&state.cfg().metrics.path).with_state(state)
}

pub fn simulated_routes() -> Router<AppState> {
    Router::new()
        .route("/ping/:id/status", get(simulate::ping))
        .route("/ping/:id/info", get(simulate::ping))
}

/// Install the fallback and the request interceptor on `routes`.
pub fn instrument(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    routes
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), obs::track_requests))
}

pub fn ops_routes(metrics_path: &str) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route(metrics_path, get(ops::metrics))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "response": "not found" })))
}
