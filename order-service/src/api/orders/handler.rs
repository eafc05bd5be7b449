//! Order API Handlers
//!
//! 处理函数只做提取和转换：已验证身份和原始凭证由提取器给出，
//! 业务流程全部在编排器里。

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{MyOrderStats, Order, OrderStats, RequestedLine};
use shared::{AppResult, BearerToken, Identity};

use crate::orchestrator::OrderOrchestrator;
use crate::state::AppState;

fn orchestrator(state: &AppState) -> OrderOrchestrator {
    OrderOrchestrator::new(state.store.clone(), state.catalog.clone())
}

/// POST /api/orders - 下单
///
/// 身份和凭证显式传入编排器，凭证随每次目录调用原样转发。
pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    token: BearerToken,
    Json(lines): Json<Vec<RequestedLine>>,
) -> AppResult<Json<Order>> {
    let order = orchestrator(&state)
        .create_order(&identity, &token, &lines)
        .await?;
    Ok(Json(order))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = orchestrator(&state).get_order(&id)?;
    Ok(Json(order))
}

/// GET /api/orders - 获取全部订单
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    let orders = orchestrator(&state).list_all()?;
    Ok(Json(orders))
}

/// GET /api/orders/my-orders - 获取当前顾客的订单
pub async fn my_orders(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<Vec<Order>>> {
    let orders = orchestrator(&state).list_mine(&identity)?;
    Ok(Json(orders))
}

/// PUT /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Identity,
) -> AppResult<Json<Order>> {
    let order = orchestrator(&state).cancel_order(&id)?;
    tracing::info!(order_id = %id, user_id = %identity.id, "Cancel requested");
    Ok(Json(order))
}

/// GET /api/orders/stats - 全量订单统计
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<OrderStats>> {
    let stats = orchestrator(&state).stats()?;
    Ok(Json(stats))
}

/// GET /api/orders/my-stats - 当前顾客的订单统计
pub async fn my_stats(
    State(state): State<AppState>,
    identity: Identity,
) -> AppResult<Json<MyOrderStats>> {
    let stats = orchestrator(&state).my_stats(&identity)?;
    Ok(Json(stats))
}
