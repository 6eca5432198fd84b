use async_trait::async_trait;
use reqwest::Client;

use super::{ClientResult, handle_response, join_url};
use crate::models::{Product, ProductPayload};

/// Remote product API (`/api/products`).
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn get_product(&self, id: &str) -> ClientResult<Product>;
    async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Product>;
    async fn update_product(&self, id: &str, payload: &ProductPayload) -> ClientResult<Product>;
}

#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: Client,
    base_url: String,
}

impl HttpProductApi {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn product_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => join_url(&self.base_url, &format!("api/products/{id}")),
            None => join_url(&self.base_url, "api/products"),
        }
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn get_product(&self, id: &str) -> ClientResult<Product> {
        let response = self.client.get(self.product_url(Some(id))).send().await?;
        handle_response(response).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Product> {
        let response = self
            .client
            .post(self.product_url(None))
            .json(payload)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> ClientResult<Product> {
        let response = self
            .client
            .put(self.product_url(Some(id)))
            .json(payload)
            .send()
            .await?;
        handle_response(response).await
    }
}
