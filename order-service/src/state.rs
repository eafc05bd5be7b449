//! 服务状态

use std::sync::Arc;

use shared::JwtService;

use crate::catalog::{CatalogApi, HttpCatalogClient};
use crate::config::Config;
use crate::store::{OrderStore, OrderStoreResult};

/// 服务状态 - 持有配置、订单存储、目录客户端和 JWT 服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
#[derive(Clone)]
pub struct AppState {
    /// 服务配置
    pub config: Config,
    /// 订单存储
    pub store: OrderStore,
    /// JWT 验证服务 (Arc 共享所有权)
    pub jwt: Arc<JwtService>,
    /// 目录服务客户端 (trait 对象，测试注入桩实现)
    pub catalog: Arc<dyn CatalogApi>,
}

impl AppState {
    /// 手动构造服务状态 (测试用)
    pub fn new(
        config: Config,
        store: OrderStore,
        jwt: Arc<JwtService>,
        catalog: Arc<dyn CatalogApi>,
    ) -> Self {
        Self {
            config,
            store,
            jwt,
            catalog,
        }
    }

    /// 从配置初始化服务状态
    pub fn initialize(config: &Config) -> OrderStoreResult<Self> {
        std::fs::create_dir_all(&config.work_dir).ok();
        let db_path = std::path::Path::new(&config.work_dir).join("orders.redb");
        let store = OrderStore::open(db_path)?;
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        let catalog = Arc::new(HttpCatalogClient::new(
            config.product_service_url.clone(),
            config.request_timeout_ms,
        ));

        Ok(Self {
            config: config.clone(),
            store,
            jwt,
            catalog,
        })
    }
}
