//! HTTP client for catalog service calls

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::BearerToken;
use shared::models::Product;

use super::{CatalogApi, CatalogClientError, CatalogClientResult};

/// HTTP client for making network requests to the product service
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a new HTTP client
    ///
    /// 每次调用受 `timeout_ms` 约束，超时按不可用处理。
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> CatalogClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // 错误响应是 {code, message}；消息用于日志，分类按状态码
            let message = serde_json::from_str::<shared::ErrorBody>(&text)
                .map(|b| b.message)
                .unwrap_or(text);

            return match status {
                StatusCode::NOT_FOUND => Err(CatalogClientError::NotFound(message)),
                StatusCode::CONFLICT => Err(CatalogClientError::InsufficientStock(message)),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(CatalogClientError::Denied(message))
                }
                _ => Err(CatalogClientError::Upstream(message)),
            };
        }

        response
            .json()
            .await
            .map_err(|e| CatalogClientError::InvalidResponse(e.to_string()))
    }

    fn transport_error(e: reqwest::Error) -> CatalogClientError {
        if e.is_timeout() || e.is_connect() {
            CatalogClientError::Unavailable(e.to_string())
        } else {
            CatalogClientError::Upstream(e.to_string())
        }
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn get_product(
        &self,
        token: &BearerToken,
        product_id: &str,
    ) -> CatalogClientResult<Product> {
        let response = self
            .client
            .get(self.url(&format!("api/products/{}", product_id)))
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::handle_response(response).await
    }

    async fn reduce_stock(
        &self,
        token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()> {
        let response = self
            .client
            .put(self.url(&format!(
                "api/products/{}/reduce-stock?quantity={}",
                product_id, quantity
            )))
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(Self::transport_error)?;

        let _: Product = Self::handle_response(response).await?;
        Ok(())
    }

    async fn restore_stock(
        &self,
        token: &BearerToken,
        product_id: &str,
        quantity: u32,
    ) -> CatalogClientResult<()> {
        let response = self
            .client
            .put(self.url(&format!(
                "api/products/{}/restore-stock?quantity={}",
                product_id, quantity
            )))
            .header(reqwest::header::AUTHORIZATION, token.authorization_value())
            .send()
            .await
            .map_err(Self::transport_error)?;

        let _: Product = Self::handle_response(response).await?;
        Ok(())
    }
}
