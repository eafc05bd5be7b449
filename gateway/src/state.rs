//! 网关状态

use std::sync::Arc;

use shared::JwtService;

use crate::config::Config;

/// 网关状态 - 配置、JWT 服务和转发用 HTTP 客户端
///
/// 网关是纯转发层，这里没有任何业务状态。
#[derive(Clone)]
pub struct GatewayState {
    /// 网关配置
    pub config: Config,
    /// JWT 验证服务 (Arc 共享所有权)
    pub jwt: Arc<JwtService>,
    /// 下游转发用 HTTP 客户端
    pub http: reqwest::Client,
}

impl GatewayState {
    /// 从配置初始化网关状态
    pub fn initialize(config: &Config) -> Self {
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: config.clone(),
            jwt,
            http,
        }
    }
}
