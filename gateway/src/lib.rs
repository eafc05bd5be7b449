//! Edge Gateway - 单一入口
//!
//! 纯转发/过滤层，不持有任何业务状态：
//!
//! - 按路径前缀把请求转发到对应的后端服务
//! - 转发前完成认证 (每条 `/api/` 路由都要求有效令牌)
//! - 跨域策略：单一允许来源、固定方法集、允许凭证、预检缓存 3600s
//! - 每个入站请求一条访问日志，每个完成的响应一条响应日志
//!
//! 验证通过的 Bearer 凭证原样随 `Authorization` 头转发给下游，
//! 下游的角色检查评估的是原始调用者的角色。

pub mod config;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod state;

// Re-export 公共类型
pub use config::Config;
pub use state::GatewayState;
