use std::{env, time::Duration};

use anyhow::Context;

use crate::validation::DEFAULT_MIN_PRICE;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub product_api_url: String,
    pub upload_url: String,
    pub min_price: f64,
    pub http_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let product_api_url = env::var("PRODUCT_API_URL").context("PRODUCT_API_URL is not set")?;
        let product_api_url = product_api_url.trim_end_matches('/').to_string();
        let upload_url =
            env::var("UPLOAD_URL").unwrap_or_else(|_| format!("{product_api_url}/api/upload"));
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let min_price = env::var("MIN_PRICE")
            .ok()
            .and_then(|p| p.parse::<f64>().ok())
            .filter(|p| p.is_finite())
            .unwrap_or(DEFAULT_MIN_PRICE);
        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(10 * 1024 * 1024);
        Ok(Self {
            host,
            port,
            product_api_url,
            upload_url,
            min_price,
            http_timeout,
            max_upload_bytes,
        })
    }
}
