//! 服务状态

use std::sync::Arc;

use shared::JwtService;

use crate::config::Config;
use crate::store::{CatalogResult, CatalogStore};

/// 服务状态 - 持有配置、目录存储和 JWT 服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
#[derive(Clone)]
pub struct AppState {
    /// 服务配置
    pub config: Config,
    /// 目录存储
    pub store: CatalogStore,
    /// JWT 验证服务 (Arc 共享所有权)
    pub jwt: Arc<JwtService>,
}

impl AppState {
    /// 手动构造服务状态 (测试用)
    pub fn new(config: Config, store: CatalogStore, jwt: Arc<JwtService>) -> Self {
        Self { config, store, jwt }
    }

    /// 从配置初始化服务状态
    pub fn initialize(config: &Config) -> CatalogResult<Self> {
        std::fs::create_dir_all(&config.work_dir).ok();
        let db_path = std::path::Path::new(&config.work_dir).join("catalog.redb");
        let store = CatalogStore::open(db_path)?;
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            store,
            jwt,
        })
    }
}
