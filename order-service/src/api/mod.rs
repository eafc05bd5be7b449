//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共路由)
//! - [`orders`] - 订单接口

pub mod health;
pub mod orders;
