//! Request logging middleware configuration

use axum::Router;
use http::Request;
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::info_span;

/// Wraps every route in an `http_request` span and logs the outcome at a
/// level matching the status class.
pub fn with_request_logging<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    version = ?request.version(),
                )
            })
            .on_request(|request: &Request<_>, _span: &tracing::Span| {
                tracing::debug!("started {} {}", request.method(), request.uri().path());
            })
            .on_response(|response: &http::Response<_>, latency: Duration, _span: &tracing::Span| {
                let status = response.status();
                let latency_ms = latency.as_millis() as u64;

                if status.is_client_error() {
                    tracing::warn!(status = status.as_u16(), latency_ms, "client error response");
                } else if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), latency_ms, "server error response");
                } else {
                    tracing::info!(status = status.as_u16(), latency_ms, "request completed");
                }
            })
            .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &tracing::Span| {
                tracing::error!(latency_ms = latency.as_millis() as u64, error = %error, "request failed");
            }),
    )
}
