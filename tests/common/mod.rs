#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use parking_lot::Mutex;
use product_admin::{
    catalog::ProductEvent,
    client::{ClientError, ClientResult, FileUploader, ProductApi},
    form::FormContext,
    models::{FileUpload, Product, ProductPayload},
    validation::DEFAULT_MIN_PRICE,
};
use tokio::sync::{Notify, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Create(ProductPayload),
    Update(String, ProductPayload),
    UploadFile(String),
    UploadFiles(Vec<String>),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

#[derive(Default)]
pub struct FakeApi {
    pub products: Mutex<HashMap<String, Product>>,
    pub calls: CallLog,
    pub fail_save: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn with_calls(calls: CallLog) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    pub fn seed(&self, product: Product) {
        self.products.lock().insert(product.id.clone(), product);
    }
}

#[async_trait]
impl ProductApi for FakeApi {
    async fn get_product(&self, id: &str) -> ClientResult<Product> {
        self.calls.lock().push(Call::Get(id.to_string()));
        self.products
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }

    async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Product> {
        self.calls.lock().push(Call::Create(payload.clone()));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "database unavailable".into(),
            });
        }
        let id = format!("p-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let product = payload.clone().into_product(id);
        self.seed(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, payload: &ProductPayload) -> ClientResult<Product> {
        self.calls
            .lock()
            .push(Call::Update(id.to_string(), payload.clone()));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "database unavailable".into(),
            });
        }
        let product = payload.clone().into_product(id);
        self.seed(product.clone());
        Ok(product)
    }
}

/// Uploads succeed with `https://cdn.test/<file name>` unless `fail` is set.
/// With a gate installed, every upload waits for the gate to open.
#[derive(Default)]
pub struct FakeUploader {
    pub calls: CallLog,
    pub fail: AtomicBool,
    pub gate: Option<Arc<Notify>>,
}

impl FakeUploader {
    pub fn with_calls(calls: CallLog) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn check(&self) -> ClientResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "storage offline".into(),
            });
        }
        Ok(())
    }
}

pub fn cdn_url(file_name: &str) -> String {
    format!("https://cdn.test/{file_name}")
}

#[async_trait]
impl FileUploader for FakeUploader {
    async fn upload_file(&self, file: &FileUpload) -> ClientResult<String> {
        self.calls
            .lock()
            .push(Call::UploadFile(file.file_name.clone()));
        self.wait_gate().await;
        self.check()?;
        Ok(cdn_url(&file.file_name))
    }

    async fn upload_files(&self, files: &[FileUpload]) -> ClientResult<Vec<String>> {
        self.calls.lock().push(Call::UploadFiles(
            files.iter().map(|f| f.file_name.clone()).collect(),
        ));
        self.wait_gate().await;
        self.check()?;
        Ok(files.iter().map(|f| cdn_url(&f.file_name)).collect())
    }
}

pub struct Harness {
    pub calls: CallLog,
    pub api: Arc<FakeApi>,
    pub uploader: Arc<FakeUploader>,
    pub ctx: FormContext,
    pub events: mpsc::UnboundedReceiver<ProductEvent>,
}

pub fn harness() -> Harness {
    harness_with_uploader(FakeUploader::with_calls)
}

pub fn harness_with_uploader(make: impl FnOnce(CallLog) -> FakeUploader) -> Harness {
    let calls: CallLog = Arc::default();
    let api = Arc::new(FakeApi::with_calls(calls.clone()));
    let uploader = Arc::new(make(calls.clone()));
    let (tx, events) = mpsc::unbounded_channel();
    let ctx = FormContext {
        api: api.clone(),
        uploader: uploader.clone(),
        events: tx,
        min_price: DEFAULT_MIN_PRICE,
    };
    Harness {
        calls,
        api,
        uploader,
        ctx,
        events,
    }
}

pub fn png(name: &str) -> FileUpload {
    FileUpload::new(name, "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

pub fn stored_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: "Desk Pro".into(),
        category: "desk".into(),
        price: 18000.0,
        sale: 15.0,
        image: "https://cdn.test/desk.png".into(),
        gallery: vec![
            "https://cdn.test/desk-1.png".into(),
            "https://cdn.test/desk-2.png".into(),
        ],
        tags: vec!["desk".into(), "home".into()],
        description: "Standing desk".into(),
    }
}
