//! 目录服务客户端
//!
//! 订单编排器通过 [`CatalogApi`] 访问商品服务。trait 是编排器的
//! 测试接缝；生产实现是 [`HttpCatalogClient`]。
//!
//! 每个方法都显式接收调用者的 [`BearerToken`]：下游的角色检查
//! 评估的是原始调用者的角色，不存在服务间凭证或全局凭证状态。

mod http;

pub use http::HttpCatalogClient;

use async_trait::async_trait;
use thiserror::Error;

use shared::BearerToken;
use shared::models::Product;

/// 目录客户端错误
///
/// 封闭集合：编排器按类别决定中止语义，而不是解析消息。
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Credential rejected by catalog service: {0}")]
    Denied(String),

    #[error("Catalog service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response from catalog service: {0}")]
    InvalidResponse(String),

    #[error("Catalog service error: {0}")]
    Upstream(String),
}

pub type CatalogClientResult<T> = Result<T, CatalogClientError>;

/// 商品服务远程接口
///
/// 调用是同步语义：编排器等待每次调用返回后才发起下一次，
/// 行与行之间不做并行扇出。
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// 获取商品 (用于行项目快照)
    async fn get_product(&self, token: &BearerToken, product_id: &str)
    -> CatalogClientResult<Product>;

    /// 原子扣减库存
    async fn reduce_stock(
        &self,
        token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()>;

    /// 回补库存 (中止编排时的补偿动作)
    async fn restore_stock(
        &self,
        token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()>;
}
