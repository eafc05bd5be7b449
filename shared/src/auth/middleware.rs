//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::security_log;

use super::jwt::{BearerToken, Identity, JwtService};
use super::role::Role;

/// 认证中间件 - 要求有效令牌
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`Identity`] 和 [`BearerToken`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查等，正常返回 404)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(jwt): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    // 验证令牌
    match jwt.verify(token) {
        Ok(claims) => {
            let identity = Identity::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed claims: {}", e)))?;
            let bearer = BearerToken::new(token);
            req.extensions_mut().insert(identity);
            req.extensions_mut().insert(bearer);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                super::jwt::AuthError::Expired => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 角色检查中间件 - 要求任一指定角色
///
/// # 参数
///
/// - `roles`: 允许的角色集合，如 `&[Role::Admin]`、`&[Role::Admin, Role::Customer]`
///
/// 检查默认拒绝：没有任何列出的角色一律 403，身份缺失一律 401。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/products", post(handler::create))
///     .route_layer(middleware::from_fn(require_role(&[Role::Admin])));
/// ```
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<Identity>()
                .ok_or(AppError::unauthorized())?;

            if !identity.has_any_role(roles) {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = identity.id.clone(),
                    username = identity.username.clone(),
                    required_roles = roles
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                );
                return Err(AppError::forbidden(format!(
                    "Requires one of roles: {}",
                    roles
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
