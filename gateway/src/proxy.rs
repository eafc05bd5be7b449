//! 请求转发
//!
//! 按路径前缀把入站请求转发到对应的后端服务。
//! 方法、查询串、JSON 请求体和 `Authorization` 头原样透传，
//! 下游的状态码和响应体原样返回。

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    response::Response,
};

use shared::{AppError, AppResult};

use crate::config::Config;
use crate::state::GatewayState;

/// 请求体大小上限 (2 MiB)
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// 按路径前缀选择下游服务
pub fn route_target<'a>(config: &'a Config, path: &str) -> Option<&'a str> {
    if path == "/api/products" || path.starts_with("/api/products/") {
        Some(&config.product_service_url)
    } else if path == "/api/orders" || path.starts_with("/api/orders/") {
        Some(&config.order_service_url)
    } else {
        None
    }
}

/// 转发处理函数 (注册为 fallback，覆盖所有已认证的 `/api/` 路径)
pub async fn forward(State(state): State<GatewayState>, req: Request) -> AppResult<Response> {
    let path = req.uri().path().to_string();

    let target = route_target(&state.config, &path)
        .ok_or_else(|| AppError::not_found(format!("No route for {}", path)))?;

    let query = req
        .uri()
        .query()
        .map(|q| format!("?{}", q))
        .unwrap_or_default();
    let url = format!("{}{}{}", target.trim_end_matches('/'), path, query);

    let method = req.method().clone();
    let authorization = req.headers().get(header::AUTHORIZATION).cloned();
    let content_type = req.headers().get(header::CONTENT_TYPE).cloned();

    let body = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::validation(format!("Failed to read request body: {}", e)))?;

    let mut request = state.http.request(method, &url);
    if let Some(authorization) = authorization {
        // 调用者的凭证原样转发，网关不替换服务间凭证
        request = request.header(header::AUTHORIZATION, authorization);
    }
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| AppError::upstream(e.to_string()))?;

    let status = upstream.status();
    let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::upstream(e.to_string()))?;

    let mut response = Response::builder().status(status);
    if let Some(content_type) = content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }
    response
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::JwtConfig;

    fn test_config() -> Config {
        Config {
            http_port: 0,
            product_service_url: "http://products:8081".to_string(),
            order_service_url: "http://orders:8082".to_string(),
            allowed_origin: "http://localhost:3000".to_string(),
            request_timeout_ms: 1000,
            jwt: JwtConfig::default(),
        }
    }

    #[test]
    fn test_route_target_by_prefix() {
        let config = test_config();

        assert_eq!(
            route_target(&config, "/api/products"),
            Some("http://products:8081")
        );
        assert_eq!(
            route_target(&config, "/api/products/p1/reduce-stock"),
            Some("http://products:8081")
        );
        assert_eq!(
            route_target(&config, "/api/orders/my-orders"),
            Some("http://orders:8082")
        );
        assert_eq!(route_target(&config, "/api/unknown"), None);
        // 前缀必须是完整路径段
        assert_eq!(route_target(&config, "/api/productsx"), None);
    }
}
