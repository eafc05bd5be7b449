//! 订单存储层

mod orders;

pub use orders::{OrderStore, OrderStoreError, OrderStoreResult};
