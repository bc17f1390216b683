use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Failure class an `ApiError` leaves on its response for the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind(pub &'static str);

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Catalog operation served by a route, keyed on the route template.
fn operation(method: &Method, route: &str) -> &'static str {
    let route = route.strip_prefix("/api").unwrap_or(route);
    match (method.as_str(), route) {
        ("GET", "/titles") => "list_titles",
        ("POST", "/titles") => "create_title",
        ("GET", "/titles/{id}") => "get_title",
        ("PUT", "/titles/{id}") => "update_title",
        ("DELETE", "/titles/{id}") => "delete_title",
        ("GET", "/summary") => "summary",
        ("POST", "/cache/invalidate") => "invalidate_cache",
        ("GET", "/health") => "health",
        ("GET", "/metrics") => "metrics",
        _ => "other",
    }
}

/// Runs after routing, so every request here has a matched route.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |mp| mp.as_str().to_string());
    let operation = operation(req.method(), &route);
    // Filters and paging are the interesting part of a listing
    let query = if operation == "list_titles" {
        req.uri().query().map(str::to_string)
    } else {
        None
    };

    let span = info_span!(
        "request",
        request_id = %request_id,
        operation,
        route = %route,
    );

    async move {
        let response = next.run(req).await;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();
        let error_kind = response.extensions().get::<ErrorKind>().map(|kind| kind.0);

        let outcome = error_kind.unwrap_or("success");
        metrics::counter!(
            "catalog_requests_total",
            "operation" => operation,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds", "operation" => operation)
            .record(start.elapsed().as_secs_f64());

        if status >= 500 {
            warn!(
                event = "catalog_request_failed",
                duration_ms,
                status_code = status,
                outcome,
                query = query.as_deref(),
                "Request failed"
            );
        } else {
            info!(
                event = "catalog_request_finished",
                duration_ms,
                status_code = status,
                outcome,
                query = query.as_deref(),
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_map_to_operations() {
        assert_eq!(operation(&Method::GET, "/api/titles"), "list_titles");
        assert_eq!(operation(&Method::PUT, "/api/titles/{id}"), "update_title");
        assert_eq!(operation(&Method::DELETE, "/titles/{id}"), "delete_title");
        assert_eq!(operation(&Method::POST, "/api/cache/invalidate"), "invalidate_cache");
        assert_eq!(operation(&Method::PATCH, "/api/titles/{id}"), "other");
    }
}
