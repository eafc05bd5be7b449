//! 服务配置

use shared::JwtConfig;

/// 订单服务配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data/order-service | 工作目录 (数据库文件) |
/// | HTTP_PORT | 8082 | HTTP 服务端口 |
/// | PRODUCT_SERVICE_URL | http://localhost:8081 | 商品服务地址 |
/// | REQUEST_TIMEOUT_MS | 30000 | 下游调用超时(毫秒) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 商品服务地址 (编排器的远程调用目标)
    pub product_service_url: String,
    /// 下游调用超时 (毫秒)，超时按不可用处理并中止编排
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
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data/order-service".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8082),
            product_service_url: std::env::var("PRODUCT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8081".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            jwt: JwtConfig::from_env(),
        }
    }
}
