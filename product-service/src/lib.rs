//! Product Service - 商品目录服务
//!
//! 持有商品的权威记录 (名称、价格、库存)，提供：
//!
//! - **目录存储** (`store`): 嵌入式 redb 存储，原子的"有货才扣减"原语
//! - **HTTP API** (`api`): 商品 CRUD、库存扣减/回补、目录统计
//!
//! 库存扣减是唯一需要在并发调用下保持安全的变更路径：
//! 检查-扣减在单个写事务内完成，提交后才返回成功。

pub mod api;
pub mod config;
pub mod routes;
pub mod state;
pub mod store;

// Re-export 公共类型
pub use config::Config;
pub use state::AppState;
pub use store::{CatalogError, CatalogResult, CatalogStore};
