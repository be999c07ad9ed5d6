//! Route table for the consultation service

use crate::{
    handlers::{
        consultations::{handle_method_not_allowed, handle_submit_consultation},
        health::handle_health,
    },
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

pub const CONSULTATIONS_PATH: &str = "/api/consultations";
pub const LEGACY_SUBMIT_PATH: &str = "/submit_consultation";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            CONSULTATIONS_PATH,
            post(handle_submit_consultation).fallback(handle_method_not_allowed),
        )
        .route(
            LEGACY_SUBMIT_PATH,
            post(handle_submit_consultation).fallback(handle_method_not_allowed),
        )
}
