use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

use crate::app_state::AppState;

/// Route label for requests that matched no route. Raw paths are never used
/// as labels.
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Method label for extension methods. Clients pick the method, so only the
/// standard ones get a series of their own.
pub const OTHER_METHOD: &str = "OTHER";

pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => OTHER_METHOD,
    }
}

/// Time every request and record it once the inner service has answered.
///
/// Never short-circuits: the request always reaches the inner service, and
/// whatever status comes back is what gets recorded.
pub async fn track_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = method_label(req.method());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());

    let res = next.run(req).await;

    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = res.status().as_u16();
    state.http_metrics().record(method, &route, status, elapsed_ms);

    tracing::debug!(method, route = %route, status, elapsed_ms, "request completed");
    res
}
