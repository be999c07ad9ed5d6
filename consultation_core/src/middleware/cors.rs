//! CORS (Cross-Origin Resource Sharing) configuration

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The booking form may be hosted on any site, so submissions are accepted
/// from every origin. Only POST with a `Content-Type` header is allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false)
        .max_age(std::time::Duration::from_secs(3600))
}
