//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 订单状态
///
/// CANCELED 是终态，不可重新激活。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Created,
    Canceled,
}

/// 订单行项目 - 下单时刻的商品快照
///
/// 名称和单价在下单时定格，之后目录价格变动不影响已存在的订单。
/// 行项目由订单独占持有，没有独立生命周期。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: String,
    /// 下单时的商品名称快照
    pub product_name: String,
    /// 下单时的单价快照
    pub price: f64,
    /// 数量 (正整数)
    pub quantity: u32,
}

/// 订单记录 - 行项目的不可变快照加可变状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// 订单 ID (创建时生成)
    pub id: String,
    /// 创建时间 (= 编排开始时间)
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    /// 下单顾客 ID (令牌 sub)
    pub customer_id: String,
    /// 总金额 = Σ 快照单价 × 数量，创建后不再重算
    pub total_amount: f64,
    pub product_items: Vec<OrderLineItem>,
}

/// 下单请求的单行 (productId, quantity)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedLine {
    pub product_id: String,
    pub quantity: u32,
}

/// 全量订单统计 (管理员视角)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: u64,
    /// 总收入，不含已取消订单
    pub total_revenue: f64,
    pub canceled_orders: u64,
}

/// 单个顾客的订单统计
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyOrderStats {
    pub count: u64,
    /// 消费总额，不含已取消订单
    pub spent: f64,
    pub active: u64,
}
