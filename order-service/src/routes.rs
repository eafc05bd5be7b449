//! 路由组装

use axum::{Router, middleware as axum_middleware};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        // Order API - role checks applied per route group
        .merge(api::orders::router())
        // Health API - public route
        .merge(api::health::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router()
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // JWT authentication - outermost, runs first, injects Identity + BearerToken
        .layer(axum_middleware::from_fn_with_state(
            state.jwt.clone(),
            shared::auth::middleware::require_auth,
        ))
        .with_state(state)
}
