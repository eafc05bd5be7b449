//! Order Orchestrator - 订单创建的多调用编排
//!
//! # 编排流程
//!
//! ```text
//! create_order(identity, token, lines)
//!     ├─ 1. 校验行列表非空、数量为正
//!     ├─ 2. 按调用方给定顺序逐行远程扣减库存 (同步，不扇出)
//!     │      └─ 失败 → 逆序回补已扣减的行，返回 StockUnavailable
//!     ├─ 3. 扣减成功后获取商品，定格名称和单价
//!     ├─ 4. Decimal 累加 总额 = Σ 单价 × 数量
//!     ├─ 5. 持久化订单 (CREATED，创建时间 = 编排开始时间)
//!     └─ 6. 返回已持久化的订单
//! ```
//!
//! 库存预留是全有或全无的：逐行扣减各自独立提交，但任何一行
//! 失败都会触发对之前各行的补偿回补 (尽力而为，失败记日志)，
//! 不会留下没有订单对应的扣减。部分订单从不持久化。
//!
//! 所有远程调用携带调用者自己的 Bearer 凭证 (显式传参)，
//! 目录侧的角色检查评估的是原始调用者的角色。路径上没有重试。

mod error;

pub use error::OrderError;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::*;

use shared::models::{Order, OrderLineItem, OrderStatus, RequestedLine};
use shared::{BearerToken, Identity};

use crate::catalog::{CatalogApi, CatalogClientError};
use crate::store::OrderStore;

/// 订单编排器
///
/// 协调目录服务 (远程) 和订单存储完成一次下单。
#[derive(Clone)]
pub struct OrderOrchestrator {
    store: OrderStore,
    catalog: Arc<dyn CatalogApi>,
}

impl OrderOrchestrator {
    pub fn new(store: OrderStore, catalog: Arc<dyn CatalogApi>) -> Self {
        Self { store, catalog }
    }

    /// 创建订单
    pub async fn create_order(
        &self,
        identity: &Identity,
        token: &BearerToken,
        lines: &[RequestedLine],
    ) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::InvalidRequest(
                "order must contain at least one line".to_string(),
            ));
        }
        if let Some(line) = lines.iter().find(|l| l.quantity == 0) {
            return Err(OrderError::InvalidRequest(format!(
                "quantity must be positive for product {}",
                line.product_id
            )));
        }

        let started_at = Utc::now();

        // 补偿日志：已成功扣减的 (product_id, quantity)
        let mut reserved: Vec<(String, u32)> = Vec::new();
        let mut items: Vec<OrderLineItem> = Vec::new();
        let mut total = Decimal::ZERO;

        for line in lines {
            // 逐行同步扣减，严格按调用方给定顺序
            if let Err(e) = self
                .catalog
                .reduce_stock(token, &line.product_id, line.quantity)
                .await
            {
                self.compensate(token, &reserved).await;
                return Err(Self::map_reserve_error(e, &line.product_id));
            }
            reserved.push((line.product_id.clone(), line.quantity));

            // 扣减成功后定格名称和单价
            let product = match self.catalog.get_product(token, &line.product_id).await {
                Ok(product) => product,
                Err(e) => {
                    self.compensate(token, &reserved).await;
                    return Err(Self::map_reserve_error(e, &line.product_id));
                }
            };

            let price = Decimal::from_f64(product.price).ok_or_else(|| {
                OrderError::Internal(format!(
                    "catalog returned non-finite price for product {}",
                    product.id
                ))
            })?;
            total += price * Decimal::from(line.quantity);

            items.push(OrderLineItem {
                product_id: product.id,
                product_name: product.name,
                price: product.price,
                quantity: line.quantity,
            });
        }

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: started_at,
            status: OrderStatus::Created,
            customer_id: identity.id.clone(),
            total_amount: total.round_dp(2).to_f64().unwrap_or(0.0),
            product_items: items,
        };

        self.store.save(&order)?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            total_amount = order.total_amount,
            lines = order.product_items.len(),
            "Order created"
        );

        Ok(order)
    }

    /// 逆序回补已扣减的行 (尽力而为)
    ///
    /// 回补失败只记日志：这里已经在错误路径上，调用方拿到的
    /// 仍是导致中止的原始错误。
    async fn compensate(&self, token: &BearerToken, reserved: &[(String, u32)]) {
        for (product_id, quantity) in reserved.iter().rev() {
            if let Err(e) = self
                .catalog
                .restore_stock(token, product_id, *quantity)
                .await
            {
                tracing::error!(
                    product_id = %product_id,
                    quantity = quantity,
                    error = %e,
                    "Failed to restore stock while aborting order"
                );
            }
        }
    }

    /// 预留失败的错误映射
    ///
    /// 库存不足、商品不存在和目录不可达 (含超时) 都中止编排并
    /// 归入 StockUnavailable；凭证被下游拒绝单独归类。
    fn map_reserve_error(e: CatalogClientError, product_id: &str) -> OrderError {
        match e {
            CatalogClientError::InsufficientStock(_)
            | CatalogClientError::NotFound(_)
            | CatalogClientError::Unavailable(_) => OrderError::StockUnavailable {
                product_id: product_id.to_string(),
            },
            CatalogClientError::Denied(msg) => OrderError::Denied(msg),
            CatalogClientError::InvalidResponse(msg) | CatalogClientError::Upstream(msg) => {
                OrderError::Upstream(msg)
            }
        }
    }

    /// 取消订单
    ///
    /// CANCELED 是终态，重复取消返回 AlreadyCanceled。
    /// 取消不回补目录库存。
    pub fn cancel_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let order = self.store.cancel(order_id)?;
        tracing::info!(order_id = %order.id, "Order canceled");
        Ok(order)
    }

    /// 按 ID 获取订单
    pub fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.store
            .find_by_id(order_id)?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// 获取全部订单 (管理员)
    pub fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.find_all()?)
    }

    /// 获取当前顾客的订单
    pub fn list_mine(&self, identity: &Identity) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.find_by_customer(&identity.id)?)
    }

    /// 全量订单统计 (管理员)
    pub fn stats(&self) -> Result<shared::models::OrderStats, OrderError> {
        Ok(self.store.stats()?)
    }

    /// 当前顾客的订单统计
    pub fn my_stats(&self, identity: &Identity) -> Result<shared::models::MyOrderStats, OrderError> {
        Ok(self.store.stats_for_customer(&identity.id)?)
    }
}
