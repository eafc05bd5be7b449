//! Shared types for the storefront services
//!
//! Common building blocks used by the gateway and both domain services:
//!
//! - **认证** (`auth`): JWT 验证、身份提取、角色检查中间件
//! - **错误** (`error`): 统一错误类型和响应结构
//! - **模型** (`models`): 跨服务的数据传输类型
//! - **日志** (`logger`): tracing 初始化

pub mod auth;
pub mod error;
pub mod logger;
pub mod models;

// Re-export 公共类型
pub use auth::{AuthError, BearerToken, Claims, Identity, JwtConfig, JwtService, Role};
pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use models::{
    MyOrderStats, Order, OrderLineItem, OrderStats, OrderStatus, Product, ProductCreate,
    ProductStats, ProductUpdate, RequestedLine,
};

// Re-exports for downstream crates
pub use axum::Json;
pub use http;

// Security logging macro - 统一安全事件日志格式
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
