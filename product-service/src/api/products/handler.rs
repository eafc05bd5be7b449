//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::models::{Product, ProductCreate, ProductStats, ProductUpdate};
use shared::{AppError, AppResult, Identity};

use crate::state::AppState;

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.store.find_all()?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .store
        .find_by_id(&id)?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload.validate().map_err(AppError::validation)?;

    let product = state.store.create(payload)?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/:id - 全量更新商品
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    payload.validate().map_err(AppError::validation)?;

    let product = state.store.update(&id, payload)?;
    tracing::info!(product_id = %product.id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete(&id)?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub quantity: u32,
}

/// PUT /api/products/:id/reduce-stock?quantity=N - 原子扣减库存
///
/// 角色检查评估的是原始调用者携带的凭证，
/// 订单编排器转发顾客令牌而不是服务间凭证。
pub async fn reduce_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StockQuery>,
    identity: Identity,
) -> AppResult<Json<Product>> {
    if query.quantity == 0 {
        return Err(AppError::validation("quantity must be positive"));
    }

    let product = state.store.decrement_stock(&id, query.quantity)?;
    tracing::info!(
        product_id = %id,
        quantity = query.quantity,
        remaining = product.stock_quantity,
        user_id = %identity.id,
        "Stock reduced"
    );
    Ok(Json(product))
}

/// PUT /api/products/:id/restore-stock?quantity=N - 回补库存 (补偿路径)
pub async fn restore_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<StockQuery>,
    identity: Identity,
) -> AppResult<Json<Product>> {
    if query.quantity == 0 {
        return Err(AppError::validation("quantity must be positive"));
    }

    let product = state.store.restore_stock(&id, query.quantity)?;
    tracing::info!(
        product_id = %id,
        quantity = query.quantity,
        stock = product.stock_quantity,
        user_id = %identity.id,
        "Stock restored"
    );
    Ok(Json(product))
}

/// GET /api/products/stats - 目录统计
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<ProductStats>> {
    let stats = state.store.stats(state.config.low_stock_threshold)?;
    Ok(Json(stats))
}
