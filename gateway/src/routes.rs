//! 路由组装

use axum::{Json, Router, http::HeaderValue, middleware as axum_middleware, routing::get};
use http::Method;
use serde::Serialize;
use tower_http::cors::{AllowHeaders, CorsLayer};

use crate::middleware::logging_middleware;
use crate::proxy;
use crate::state::GatewayState;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        service: "gateway",
    })
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<GatewayState> {
    Router::new()
        // Health API - public route
        .route("/health", get(health))
        // 其余路径全部进入转发处理函数 (认证在中间件完成)
        .fallback(proxy::forward)
}

/// 跨域策略：单一允许来源、固定方法集、允许凭证、预检缓存 3600s
///
/// 允许凭证时不能用通配符响应头，镜像请求头等价于"允许所有头"。
fn cors_layer(state: &GatewayState) -> CorsLayer {
    let origin = state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .expect("ALLOWED_ORIGIN is not a valid header value");

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: GatewayState) -> Router {
    build_router()
        // Request logging - sees the authenticated identity
        .layer(axum_middleware::from_fn(logging_middleware))
        // JWT authentication - every /api/ route requires a valid token
        .layer(axum_middleware::from_fn_with_state(
            state.jwt.clone(),
            shared::auth::middleware::require_auth,
        ))
        // CORS - outermost so even auth rejections carry CORS headers
        .layer(cors_layer(&state))
        .with_state(state)
}
