//! Order API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/orders | POST | CUSTOMER |
//! | /api/orders | GET | ADMIN |
//! | /api/orders/{id} | GET | ADMIN, CUSTOMER |
//! | /api/orders/my-orders | GET | CUSTOMER |
//! | /api/orders/{id}/cancel | PUT | CUSTOMER |
//! | /api/orders/stats | GET | ADMIN |
//! | /api/orders/my-stats | GET | CUSTOMER |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use shared::Role;
use shared::auth::middleware::require_role;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<AppState> {
    // 角色检查按路由组挂载，默认拒绝
    let read = Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route_layer(middleware::from_fn(require_role(&[
            Role::Admin,
            Role::Customer,
        ])));

    let admin = Router::new()
        .route("/", get(handler::list_all))
        .route("/stats", get(handler::stats))
        .route_layer(middleware::from_fn(require_role(&[Role::Admin])));

    let customer = Router::new()
        .route("/", post(handler::create))
        .route("/my-orders", get(handler::my_orders))
        .route("/my-stats", get(handler::my_stats))
        .route("/{id}/cancel", put(handler::cancel))
        .route_layer(middleware::from_fn(require_role(&[Role::Customer])));

    Router::new().merge(read).merge(admin).merge(customer)
}
