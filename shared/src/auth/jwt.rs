//! JWT 令牌服务
//!
//! 处理 JWT 令牌的验证和解析。令牌由外部认证服务签发；
//! 本服务只持有验证密钥。测试通过 [`JwtService::generate_token`]
//! 自行铸造令牌。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::role::Role;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载配置
    ///
    /// | 环境变量 | 默认值 |
    /// |----------|--------|
    /// | JWT_SECRET | 开发用固定密钥 |
    /// | JWT_EXPIRATION_MINUTES | 1440 |
    /// | JWT_ISSUER | storefront-auth |
    /// | JWT_AUDIENCE | storefront-services |
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                tracing::warn!("JWT_SECRET shorter than 32 bytes, using development key");
                default_dev_secret()
            }
            Err(_) => {
                tracing::warn!("⚠️  JWT_SECRET not set! Using development key.");
                default_dev_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-services".to_string()),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_dev_secret(),
            expiration_minutes: 1440,
            issuer: "storefront-auth".to_string(),
            audience: "storefront-services".to_string(),
        }
    }
}

fn default_dev_secret() -> String {
    "storefront-development-secret-key-32b!".to_string()
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 角色列表 (逗号分隔)
    pub roles: String,
    /// 令牌类型
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// 认证错误
///
/// 任何结构或密码学缺陷都拒绝令牌，从不静默接受。
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("令牌已过期")]
    Expired,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌格式错误: {0}")]
    Malformed(String),

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    ///
    /// 签发属于外部认证服务的职责，这里保留生成能力供测试铸造令牌。
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[Role],
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let roles_str = roles
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            roles: roles_str,
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 请求身份 (从 JWT Claims 解析)
///
/// 由认证中间件创建并注入请求扩展，处理函数通过提取器获取。
/// 每个请求从验证过的令牌重建，从不持久化，也绝不放进全局状态。
#[derive(Debug, Clone)]
pub struct Identity {
    /// 用户 ID
    pub id: String,
    /// 用户名
    pub username: String,
    /// 角色列表
    pub roles: Vec<Role>,
}

impl TryFrom<Claims> for Identity {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let roles = if claims.roles.is_empty() {
            vec![]
        } else {
            claims
                .roles
                .split(',')
                .map(|s| {
                    s.parse::<Role>()
                        .map_err(|e| AuthError::Malformed(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            id: claims.sub,
            username: claims.username,
            roles,
        })
    }
}

impl Identity {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// 检查是否拥有指定角色
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// 检查是否拥有任一指定角色
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }
}

/// 请求携带的原始 Bearer 凭证
///
/// 中间件在验证成功后注入，编排器把它原样附到下游调用的
/// `Authorization` 头上。显式传参，从不走全局状态。
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` 头的值
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_generation_and_verification() {
        let service = JwtService::new();

        let token = service
            .generate_token("user123", "john_doe", &[Role::Customer])
            .expect("Failed to generate test token");

        let claims = service
            .verify(&token)
            .expect("Failed to verify test token");

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.username, "john_doe");
        assert_eq!(claims.roles, "CUSTOMER");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = JwtService::new();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-32-bytes!!".to_string(),
            ..JwtConfig::default()
        });

        let token = other
            .generate_token("user123", "john_doe", &[Role::Customer])
            .unwrap();

        match service.verify(&token) {
            Err(AuthError::InvalidSignature) => {}
            other => panic!("expected InvalidSignature, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = JwtService::new();
        assert!(matches!(
            service.verify("not-a-jwt"),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::with_config(JwtConfig {
            expiration_minutes: -5,
            ..JwtConfig::default()
        });

        let token = service
            .generate_token("user123", "john_doe", &[Role::Customer])
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_identity_from_claims() {
        let service = JwtService::new();
        let token = service
            .generate_token("u1", "alice", &[Role::Customer, Role::Admin])
            .unwrap();
        let claims = service.verify(&token).unwrap();

        let identity = Identity::try_from(claims).unwrap();
        assert_eq!(identity.id, "u1");
        assert!(identity.is_admin());
        assert!(identity.has_role(Role::Customer));
    }

    #[test]
    fn test_identity_rejects_unknown_role() {
        let claims = Claims {
            sub: "u1".to_string(),
            username: "alice".to_string(),
            roles: "CUSTOMER,ROOT".to_string(),
            token_type: "access".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
            iss: "storefront-auth".to_string(),
            aud: "storefront-services".to_string(),
        };

        assert!(Identity::try_from(claims).is_err());
    }
}
