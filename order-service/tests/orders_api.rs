//! Order API integration tests
//!
//! 通过完整路由栈 (认证中间件 + 角色检查 + 编排器) 验证订单接口，
//! 目录服务用内存桩代替。

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dashmap::DashMap;
use tower::util::ServiceExt;

use order_service::catalog::{CatalogApi, CatalogClientError, CatalogClientResult};
use order_service::{AppState, Config, OrderStore, routes};
use shared::models::Product;
use shared::{BearerToken, JwtConfig, JwtService, Role};

/// 内存目录桩：库存语义与真实目录一致
struct MockCatalog {
    products: DashMap<String, Product>,
}

impl MockCatalog {
    fn new() -> Self {
        Self {
            products: DashMap::new(),
        }
    }

    fn with_product(self, id: &str, name: &str, price: f64, stock: u32) -> Self {
        self.products.insert(
            id.to_string(),
            Product {
                id: id.to_string(),
                name: name.to_string(),
                description: String::new(),
                price,
                stock_quantity: stock,
            },
        );
        self
    }

    fn stock(&self, id: &str) -> u32 {
        self.products.get(id).unwrap().stock_quantity
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn get_product(
        &self,
        _token: &BearerToken,
        product_id: &str,
    ) -> CatalogClientResult<Product> {
        self.products
            .get(product_id)
            .map(|p| p.value().clone())
            .ok_or_else(|| CatalogClientError::NotFound(product_id.to_string()))
    }

    async fn reduce_stock(
        &self,
        _token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()> {
        let mut product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogClientError::NotFound(product_id.to_string()))?;
        if product.stock_quantity < quantity {
            return Err(CatalogClientError::InsufficientStock(format!(
                "requested {}, available {}",
                quantity, product.stock_quantity
            )));
        }
        product.stock_quantity -= quantity;
        Ok(())
    }

    async fn restore_stock(
        &self,
        _token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()> {
        let mut product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| CatalogClientError::NotFound(product_id.to_string()))?;
        product.stock_quantity += quantity;
        Ok(())
    }
}

fn test_app(catalog: MockCatalog) -> (Router, Arc<JwtService>, Arc<MockCatalog>) {
    let jwt_config = JwtConfig::default();
    let jwt = Arc::new(JwtService::with_config(jwt_config.clone()));
    let config = Config {
        work_dir: ".".to_string(),
        http_port: 0,
        product_service_url: "http://unused".to_string(),
        request_timeout_ms: 1000,
        jwt: jwt_config,
    };
    let store = OrderStore::open_in_memory().unwrap();
    let catalog = Arc::new(catalog);
    let state = AppState::new(config, store, jwt.clone(), catalog.clone());
    (routes::build_app(state), jwt, catalog)
}

fn admin_token(jwt: &JwtService) -> String {
    jwt.generate_token("admin-1", "alice", &[Role::Admin]).unwrap()
}

fn customer_token(jwt: &JwtService) -> String {
    jwt.generate_token("cust-1", "bob", &[Role::Customer]).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_unauthenticated_is_rejected() {
    let (app, _jwt, _catalog) = test_app(MockCatalog::new());

    let (status, body) = send(&app, "GET", "/api/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn test_admin_cannot_place_order() {
    let (app, jwt, _catalog) = test_app(
        MockCatalog::new().with_product("p1", "Widget", 100.0, 10),
    );
    let admin = admin_token(&jwt);

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&admin),
        Some(serde_json::json!([{"productId": "p1", "quantity": 1}])),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_order_flow_spec_scenario() {
    // 目录：Product(p1, stock=10, price=100)
    let (app, jwt, catalog) = test_app(
        MockCatalog::new().with_product("p1", "Widget", 100.0, 10),
    );
    let customer = customer_token(&jwt);

    // 顾客下单 [{productId: p1, quantity: 3}] → 库存 7，订单 300 CREATED
    let (status, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 3}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "CREATED");
    assert_eq!(order["totalAmount"], 300.0);
    assert_eq!(order["customerId"], "cust-1");
    assert_eq!(catalog.stock("p1"), 7);

    // 第二单要 8，只剩 7 → 409，不创建订单
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 8}])),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E4001");

    let (_, mine) = send(&app, "GET", "/api/orders/my-orders", Some(&customer), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_order_is_bad_request() {
    let (app, jwt, _catalog) = test_app(MockCatalog::new());
    let customer = customer_token(&jwt);

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn test_cancel_flow() {
    let (app, jwt, _catalog) = test_app(
        MockCatalog::new().with_product("p1", "Widget", 100.0, 10),
    );
    let customer = customer_token(&jwt);

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 1}])),
    )
    .await;
    let id = order["id"].as_str().unwrap().to_string();

    let (status, canceled) = send(
        &app,
        "PUT",
        &format!("/api/orders/{}/cancel", id),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["status"], "CANCELED");

    // 重复取消 → 409 专属错误码
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/orders/{}/cancel", id),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E4002");
}

#[tokio::test]
async fn test_order_visibility_and_stats() {
    let (app, jwt, _catalog) = test_app(
        MockCatalog::new().with_product("p1", "Widget", 100.0, 100),
    );
    let customer = customer_token(&jwt);
    let admin = admin_token(&jwt);

    let (_, o1) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 1}])),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 2}])),
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/orders/{}/cancel", o1["id"].as_str().unwrap()),
        Some(&customer),
        None,
    )
    .await;

    // 顾客不能列出全部订单
    let (status, _) = send(&app, "GET", "/api/orders", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 管理员能
    let (status, all) = send(&app, "GET", "/api/orders", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    // 管理员统计：取消的订单不计收入
    let (status, stats) = send(&app, "GET", "/api/orders/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalOrders"], 2);
    assert_eq!(stats["canceledOrders"], 1);
    assert_eq!(stats["totalRevenue"], 200.0);

    // 顾客统计
    let (status, mine) = send(&app, "GET", "/api/orders/my-stats", Some(&customer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["count"], 2);
    assert_eq!(mine["active"], 1);
    assert_eq!(mine["spent"], 200.0);

    // 统计是管理员专属
    let (status, _) = send(&app, "GET", "/api/orders/stats", Some(&customer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_order_by_id() {
    let (app, jwt, _catalog) = test_app(
        MockCatalog::new().with_product("p1", "Widget", 100.0, 10),
    );
    let customer = customer_token(&jwt);
    let admin = admin_token(&jwt);

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&customer),
        Some(serde_json::json!([{"productId": "p1", "quantity": 1}])),
    )
    .await;
    let id = order["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, "GET", &format!("/api/orders/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id.as_str());

    let (status, body) = send(&app, "GET", "/api/orders/missing", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}
