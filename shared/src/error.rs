//! 统一错误处理
//!
//! 提供应用级错误类型和错误响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ErrorBody`] - 错误响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E2xxx | 权限错误 | E2001 无权限 |
//! | E3xxx | 认证令牌错误 | E3002 无效令牌 |
//! | E4xxx | 业务冲突 | E4001 库存不足 |
//! | E9xxx | 系统错误 | E9002 存储错误 |
//!
//! 成功响应直接返回实体 JSON；只有错误走 [`ErrorBody`]。内部错误文本
//! 和触发错误的用户身份记录在日志里，不回传给客户端。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// 错误响应结构
///
/// ```json
/// {
///   "code": "E4001",
///   "message": "Insufficient stock"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 错误码
    pub code: String,
    /// 消息
    pub message: String,
}

/// 封闭的错误类别集合
///
/// 每个类别对应一个稳定的错误码字符串和 HTTP 状态码，
/// 调用方和测试按类别区分失败，而不是解析消息文本。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// 未登录 (401)
    Unauthorized,
    /// 令牌过期 (401)
    TokenExpired,
    /// 无效令牌 (401)
    InvalidToken,
    /// 无权限 (403)
    Forbidden,
    /// 资源不存在 (404)
    NotFound,
    /// 验证失败 (400)
    Validation,
    /// 资源冲突 (409)
    Conflict,
    /// 库存不足 (409)
    InsufficientStock,
    /// 订单已取消 (409)
    AlreadyCanceled,
    /// 下游服务错误 (502)
    Upstream,
    /// 存储错误 (500)
    Storage,
    /// 内部错误 (500)
    Internal,
}

impl ErrorCode {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InsufficientStock => StatusCode::CONFLICT,
            Self::AlreadyCanceled => StatusCode::CONFLICT,
            Self::Upstream => StatusCode::BAD_GATEWAY,
            Self::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 获取错误码字符串
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E3001",
            Self::TokenExpired => "E3003",
            Self::InvalidToken => "E3002",
            Self::Forbidden => "E2001",
            Self::NotFound => "E0003",
            Self::Validation => "E0002",
            Self::Conflict => "E0004",
            Self::InsufficientStock => "E4001",
            Self::AlreadyCanceled => "E4002",
            Self::Upstream => "E9003",
            Self::Storage => "E9002",
            Self::Internal => "E9001",
        }
    }
}

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 未登录、令牌过期、无效令牌 |
/// | 业务逻辑错误 | 资源不存在、验证失败、库存不足、重复取消 |
/// | 系统错误 | 存储错误、下游服务错误、内部错误 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401/403) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Order already canceled: {0}")]
    AlreadyCanceled(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取错误类别
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::TokenExpired => ErrorCode::TokenExpired,
            AppError::InvalidToken(_) => ErrorCode::InvalidToken,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Validation(_) => ErrorCode::Validation,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::InsufficientStock(_) => ErrorCode::InsufficientStock,
            AppError::AlreadyCanceled(_) => ErrorCode::AlreadyCanceled,
            AppError::Upstream(_) => ErrorCode::Upstream,
            AppError::Storage(_) => ErrorCode::Storage,
            AppError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();

        let message = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => "Please login first".to_string(),
            AppError::TokenExpired => "Token expired".to_string(),
            AppError::InvalidToken(_) => "Invalid token".to_string(),

            // Authorization errors (403)
            AppError::Forbidden(msg) => msg.clone(),

            // Business errors (4xx) - message is safe to surface
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InsufficientStock(msg) => msg.clone(),
            AppError::AlreadyCanceled(msg) => msg.clone(),

            // System errors (5xx) - log details, return generic message
            AppError::Upstream(msg) => {
                error!(target: "upstream", error = %msg, "Upstream service error");
                "Upstream service error".to_string()
            }
            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                "Storage error".to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorBody {
            code: code.code().to_string(),
            message,
        });

        (code.status_code(), body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized
    }

    pub fn token_expired() -> Self {
        AppError::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        AppError::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        AppError::InsufficientStock(msg.into())
    }

    pub fn already_canceled(msg: impl Into<String>) -> Self {
        AppError::AlreadyCanceled(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(
            ErrorCode::InsufficientStock.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::AlreadyCanceled.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Upstream.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_distinct_conflict_codes() {
        // 库存不足和重复取消是不同的错误码，调用方能区分
        assert_ne!(
            ErrorCode::InsufficientStock.code(),
            ErrorCode::AlreadyCanceled.code()
        );
        assert_eq!(
            AppError::insufficient_stock("x").error_code(),
            ErrorCode::InsufficientStock
        );
    }
}
