//! Product API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/products | GET | ADMIN, CUSTOMER |
//! | /api/products | POST | ADMIN |
//! | /api/products/{id} | GET | ADMIN, CUSTOMER |
//! | /api/products/{id} | PUT | ADMIN |
//! | /api/products/{id} | DELETE | ADMIN |
//! | /api/products/{id}/reduce-stock | PUT | CUSTOMER |
//! | /api/products/{id}/restore-stock | PUT | CUSTOMER |
//! | /api/products/stats | GET | ADMIN |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use shared::Role;
use shared::auth::middleware::require_role;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<AppState> {
    // 角色检查按路由组挂载，默认拒绝
    let read = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route_layer(middleware::from_fn(require_role(&[
            Role::Admin,
            Role::Customer,
        ])));

    let admin = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/stats", get(handler::stats))
        .route_layer(middleware::from_fn(require_role(&[Role::Admin])));

    // 库存变更由订单编排器以顾客身份调用 (凭证原样转发)
    let customer = Router::new()
        .route("/{id}/reduce-stock", put(handler::reduce_stock))
        .route("/{id}/restore-stock", put(handler::restore_stock))
        .route_layer(middleware::from_fn(require_role(&[Role::Customer])));

    Router::new().merge(read).merge(admin).merge(customer)
}
