//! 编排器错误

use thiserror::Error;

use crate::store::OrderStoreError;

/// 订单编排错误
///
/// 封闭集合：调用方和测试按类别区分失败，而不是解析消息文本。
#[derive(Debug, Error)]
pub enum OrderError {
    /// 请求本身不合法 (空行列表、数量为零)
    #[error("Invalid order request: {0}")]
    InvalidRequest(String),

    /// 某一行无法预留库存 (不足、商品不存在或目录不可达)
    #[error("Stock unavailable for product {product_id}")]
    StockUnavailable { product_id: String },

    /// 订单不存在
    #[error("Order not found: {0}")]
    NotFound(String),

    /// 订单已处于终态
    #[error("Order already canceled: {0}")]
    AlreadyCanceled(String),

    /// 下游拒绝了转发的凭证
    #[error("Credential rejected downstream: {0}")]
    Denied(String),

    /// 目录服务返回了无法归类的错误
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// 存储错误
    #[error("Store error: {0}")]
    Store(OrderStoreError),

    /// 不变量被破坏 (如目录返回非法价格)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderStoreError> for OrderError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::NotFound(id) => OrderError::NotFound(id),
            OrderStoreError::AlreadyCanceled(id) => OrderError::AlreadyCanceled(id),
            other => OrderError::Store(other),
        }
    }
}

impl From<OrderError> for shared::AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::InvalidRequest(msg) => shared::AppError::validation(msg),
            OrderError::StockUnavailable { product_id } => shared::AppError::insufficient_stock(
                format!("Stock unavailable for product {}", product_id),
            ),
            OrderError::NotFound(id) => shared::AppError::not_found(format!("Order {}", id)),
            OrderError::AlreadyCanceled(id) => {
                shared::AppError::already_canceled(format!("Order {}", id))
            }
            OrderError::Denied(msg) => shared::AppError::forbidden(msg),
            OrderError::Upstream(msg) => shared::AppError::upstream(msg),
            OrderError::Store(e) => shared::AppError::storage(e.to_string()),
            OrderError::Internal(msg) => shared::AppError::internal(msg),
        }
    }
}
