//! redb-based order store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | 订单权威记录 |
//!
//! 订单一经创建行项目即不可变，唯一的变更是状态转移 (取消)，
//! 在单个写事务内完成检查和写入。订单从不物理删除。
//! 聚合读取在单个读事务内完成，redb 读事务是一致快照。

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use rust_decimal::prelude::*;
use shared::models::{MyOrderStats, Order, OrderStats, OrderStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Order store errors
#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order already canceled: {0}")]
    AlreadyCanceled(String),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type OrderStoreResult<T> = Result<T, OrderStoreError>;

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open (or create) the order database at the given path
    pub fn open(path: impl AsRef<Path>) -> OrderStoreResult<Self> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory order database (tests)
    pub fn open_in_memory() -> OrderStoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Persist an order
    pub fn save(&self, order: &Order) -> OrderStoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Find order by id
    pub fn find_by_id(&self, id: &str) -> OrderStoreResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Find all orders
    pub fn find_all(&self) -> OrderStoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    /// Find all orders owned by a customer
    pub fn find_by_customer(&self, customer_id: &str) -> OrderStoreResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.customer_id == customer_id {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    /// Transition an order to CANCELED
    ///
    /// CANCELED 是终态：重复取消返回 [`OrderStoreError::AlreadyCanceled`]
    /// 且不改变任何状态。检查和写入在同一个写事务内。
    pub fn cancel(&self, id: &str) -> OrderStoreResult<Order> {
        let txn = self.db.begin_write()?;
        let order = {
            let mut table = txn.open_table(ORDERS_TABLE)?;

            let mut order: Order = {
                let guard = table
                    .get(id)?
                    .ok_or_else(|| OrderStoreError::NotFound(id.to_string()))?;
                serde_json::from_slice(guard.value())?
            };

            if order.status == OrderStatus::Canceled {
                return Err(OrderStoreError::AlreadyCanceled(id.to_string()));
            }

            order.status = OrderStatus::Canceled;
            let value = serde_json::to_vec(&order)?;
            table.insert(id, value.as_slice())?;
            order
        };
        txn.commit()?;

        Ok(order)
    }

    // ========== Statistics ==========

    /// 全量订单统计 - 单个读事务内的一致快照
    pub fn stats(&self) -> OrderStoreResult<OrderStats> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut total_orders = 0u64;
        let mut canceled_orders = 0u64;
        let mut revenue = Decimal::ZERO;

        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            total_orders += 1;
            match order.status {
                OrderStatus::Canceled => canceled_orders += 1,
                OrderStatus::Created => {
                    revenue += Decimal::from_f64(order.total_amount).unwrap_or(Decimal::ZERO);
                }
            }
        }

        Ok(OrderStats {
            total_orders,
            total_revenue: revenue.round_dp(2).to_f64().unwrap_or(0.0),
            canceled_orders,
        })
    }

    /// 单个顾客的订单统计 - 单个读事务内的一致快照
    pub fn stats_for_customer(&self, customer_id: &str) -> OrderStoreResult<MyOrderStats> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut count = 0u64;
        let mut active = 0u64;
        let mut spent = Decimal::ZERO;

        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.customer_id != customer_id {
                continue;
            }
            count += 1;
            if order.status == OrderStatus::Created {
                active += 1;
                spent += Decimal::from_f64(order.total_amount).unwrap_or(Decimal::ZERO);
            }
        }

        Ok(MyOrderStats {
            count,
            spent: spent.round_dp(2).to_f64().unwrap_or(0.0),
            active,
        })
    }
}
