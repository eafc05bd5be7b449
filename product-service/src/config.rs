//! 服务配置

use shared::JwtConfig;

/// 商品服务配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data/product-service | 工作目录 (数据库文件) |
/// | HTTP_PORT | 8081 | HTTP 服务端口 |
/// | LOW_STOCK_THRESHOLD | 10 | 低库存统计阈值 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 库存低于该值计入 lowStock 统计
    pub low_stock_threshold: u32,
    /// JWT 验证配置
    pub jwt: JwtConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "./data/product-service".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
            low_stock_threshold: std::env::var("LOW_STOCK_THRESHOLD")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            jwt: JwtConfig::from_env(),
        }
    }
}
