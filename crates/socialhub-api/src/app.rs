//! Application builder: wires router, middleware and state into an Axum app.

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
