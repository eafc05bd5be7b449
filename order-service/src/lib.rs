//! Order Service - 订单服务
//!
//! 负责订单创建的编排路径：认证请求 → 逐行远程扣减库存 →
//! 快照定价 → 持久化订单 → 幂等的读取/聚合接口。
//!
//! # 模块结构
//!
//! - **编排器** (`orchestrator`): 订单创建/取消和统计聚合
//! - **目录客户端** (`catalog`): 到商品服务的 RPC 客户端，原样转发调用者凭证
//! - **订单存储** (`store`): 嵌入式 redb 存储
//! - **HTTP API** (`api`): 订单接口
//!
//! 库存预留是全有或全无的：任何一行失败时，之前已提交的
//! 扣减会被逆序回补（补偿动作日志），绝不留下无主扣减。

pub mod api;
pub mod catalog;
pub mod config;
pub mod orchestrator;
pub mod routes;
pub mod state;
pub mod store;

// Re-export 公共类型
pub use catalog::{CatalogApi, CatalogClientError, HttpCatalogClient};
pub use config::Config;
pub use orchestrator::{OrderError, OrderOrchestrator};
pub use state::AppState;
pub use store::{OrderStore, OrderStoreError};
