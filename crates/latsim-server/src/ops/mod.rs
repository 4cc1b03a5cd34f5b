//! Operational HTTP endpoints. Mounted outside the request interceptor.
//!
//! - `/healthz`  : liveness
//! - `/metrics`  : Prometheus text format (path is configurable)

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}};
use latsim_core::metrics::TEXT_CONTENT_TYPE;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.registry().export();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
