//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共路由)
//! - [`products`] - 商品目录接口

pub mod health;
pub mod products;
