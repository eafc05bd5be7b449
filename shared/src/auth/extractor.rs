//! 身份提取器
//!
//! 从请求扩展中提取认证中间件注入的 [`Identity`] 和 [`BearerToken`]。

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

use super::jwt::{BearerToken, Identity};

/// 提取当前请求的已验证身份
///
/// 认证中间件先于路由执行并注入 [`Identity`]；
/// 扩展中没有身份说明请求未经认证。
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 提取当前请求的原始 Bearer 凭证
///
/// 编排器用它把调用者的凭证原样转发给下游服务。
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
