//! 目录存储层

mod catalog;

pub use catalog::{CatalogError, CatalogResult, CatalogStore};
