//! 网关配置

use shared::JwtConfig;

/// 网关配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 8080 | HTTP 服务端口 |
/// | PRODUCT_SERVICE_URL | http://localhost:8081 | 商品服务地址 |
/// | ORDER_SERVICE_URL | http://localhost:8082 | 订单服务地址 |
/// | ALLOWED_ORIGIN | http://localhost:3000 | 唯一允许的跨域来源 |
/// | REQUEST_TIMEOUT_MS | 30000 | 下游转发超时(毫秒) |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP 服务端口
    pub http_port: u16,
    /// 商品服务地址
    pub product_service_url: String,
    /// 订单服务地址
    pub order_service_url: String,
    /// 唯一允许的跨域来源
    pub allowed_origin: String,
    /// 下游转发超时 (毫秒)
    pub request_timeout_ms: u64,
    /// JWT 验证配置
    pub jwt: JwtConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            product_service_url: std::env::var("PRODUCT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".into()),
            order_service_url: std::env::var("ORDER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8082".into()),
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            jwt: JwtConfig::from_env(),
        }
    }
}
