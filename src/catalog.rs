//! In-memory list of products saved through this service.
//!
//! Only the catalog task mutates the list. Form controllers report saves by
//! sending a [`ProductEvent`] over the catalog channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, mpsc};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductEvent {
    Created(Product),
    Updated(Product),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub product: Product,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ProductCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
    tx: mpsc::UnboundedSender<ProductEvent>,
}

impl ProductCatalog {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ProductEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let catalog = Arc::new(Self {
            entries: RwLock::new(Vec::new()),
            tx,
        });
        (catalog, rx)
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<ProductEvent> {
        self.tx.clone()
    }

    /// Applies events as they arrive. Spawned once at startup.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<ProductEvent>) {
        while let Some(event) = rx.recv().await {
            self.apply(event).await;
        }
        tracing::debug!("catalog channel closed");
    }

    pub async fn apply(&self, event: ProductEvent) {
        let mut entries = self.entries.write().await;
        let synced_at = Utc::now();
        match event {
            ProductEvent::Created(product) => {
                tracing::debug!(product_id = %product.id, "catalog: product created");
                entries.retain(|e| e.product.id != product.id);
                entries.push(CatalogEntry { product, synced_at });
            }
            ProductEvent::Updated(product) => {
                tracing::debug!(product_id = %product.id, "catalog: product updated");
                match entries.iter_mut().find(|e| e.product.id == product.id) {
                    Some(entry) => {
                        entry.product = product;
                        entry.synced_at = synced_at;
                    }
                    None => entries.push(CatalogEntry { product, synced_at }),
                }
            }
        }
    }

    pub async fn list(&self) -> Vec<CatalogEntry> {
        self.entries.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Product> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.product.id == id)
            .map(|e| e.product.clone())
    }
}
