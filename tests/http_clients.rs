use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use parking_lot::Mutex;
use product_admin::{
    client::{
        ClientError, FileUploader, HttpProductApi, HttpUploader, ProductApi, build_http_client,
    },
    models::{FileUpload, Product, ProductPayload},
};
use serde_json::{Value, json};

#[derive(Default)]
struct Remote {
    products: Mutex<HashMap<String, Product>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
}

type Shared = Arc<Remote>;

async fn get_product(
    State(remote): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let product = remote.products.lock().get(&id).cloned();
    match product {
        // The remote wraps reads in an envelope and answers writes bare.
        Some(p) => Ok(Json(json!({ "data": p }))),
        None => Err((StatusCode::NOT_FOUND, format!("no product {id}"))),
    }
}

async fn create_product(
    State(remote): State<Shared>,
    Json(payload): Json<ProductPayload>,
) -> Json<Product> {
    let id = format!("{}", remote.products.lock().len() + 100);
    let product = payload.into_product(id.clone());
    remote.products.lock().insert(id, product.clone());
    Json(product)
}

async fn update_product(
    State(remote): State<Shared>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>, StatusCode> {
    let mut products = remote.products.lock();
    if !products.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let product = payload.into_product(id.clone());
    products.insert(id, product.clone());
    Ok(Json(product))
}

async fn read_files(remote: &Remote, mut multipart: Multipart, field: &str) -> Vec<String> {
    let mut urls = Vec::new();
    while let Ok(Some(part)) = multipart.next_field().await {
        if part.name() != Some(field) {
            continue;
        }
        let file_name = part.file_name().unwrap_or_default().to_string();
        let content_type = part.content_type().unwrap_or_default().to_string();
        let len = part.bytes().await.map(|b| b.len()).unwrap_or_default();
        remote
            .uploads
            .lock()
            .push((file_name.clone(), content_type, len));
        urls.push(format!("https://cdn.test/{file_name}"));
    }
    urls
}

async fn upload_one(State(remote): State<Shared>, multipart: Multipart) -> Json<Value> {
    let urls = read_files(&remote, multipart, "file").await;
    Json(json!({ "url": urls.first() }))
}

async fn upload_many(State(remote): State<Shared>, multipart: Multipart) -> Json<Value> {
    let urls = read_files(&remote, multipart, "files").await;
    Json(json!({ "urls": urls }))
}

async fn broken(State(_): State<Shared>, _body: axum::body::Bytes) -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "storage offline")
}

async fn spawn_remote() -> anyhow::Result<(String, Shared)> {
    let remote = Shared::default();
    let router = Router::new()
        .route("/api/products", post(create_product))
        .route("/api/products/{id}", get(get_product).put(update_product))
        .route("/upload", post(upload_one))
        .route("/upload/multiple", post(upload_many))
        .route("/broken", post(broken))
        .with_state(remote.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((format!("http://{addr}"), remote))
}

fn payload() -> ProductPayload {
    ProductPayload {
        name: "Sofa C".into(),
        category: "sofa".into(),
        price: 32000.0,
        sale: 20.0,
        image: "https://cdn.test/sofa.png".into(),
        gallery: vec![],
        tags: vec!["sofa".into(), "home".into()],
        description: "Three seats".into(),
    }
}

#[tokio::test]
async fn product_api_creates_reads_and_updates() -> anyhow::Result<()> {
    let (base, remote) = spawn_remote().await?;
    let api = HttpProductApi::new(build_http_client(Duration::from_secs(5))?, &format!("{base}/"));

    let created = api.create_product(&payload()).await?;
    assert_eq!(created.id, "100");
    assert_eq!(created.name, "Sofa C");

    let fetched = api.get_product(&created.id).await?;
    assert_eq!(fetched, created);

    let mut changed = ProductPayload::from(&fetched);
    changed.price = 20000.0;
    let updated = api.update_product(&created.id, &changed).await?;
    assert_eq!(updated.price, 20000.0);
    assert_eq!(
        remote.products.lock().get("100").map(|p| p.price),
        Some(20000.0)
    );
    Ok(())
}

#[tokio::test]
async fn product_api_maps_missing_records_to_not_found() -> anyhow::Result<()> {
    let (base, _remote) = spawn_remote().await?;
    let api = HttpProductApi::new(build_http_client(Duration::from_secs(5))?, &base);

    let err = api.get_product("nope").await.expect_err("missing");
    assert!(matches!(err, ClientError::NotFound(ref body) if body.contains("nope")));
    Ok(())
}

#[tokio::test]
async fn uploader_sends_single_and_batch_files() -> anyhow::Result<()> {
    let (base, remote) = spawn_remote().await?;
    let uploader = HttpUploader::new(
        build_http_client(Duration::from_secs(5))?,
        &format!("{base}/upload"),
    );

    let url = uploader
        .upload_file(&FileUpload::new("main.png", "image/png", vec![1, 2, 3]))
        .await?;
    assert_eq!(url, "https://cdn.test/main.png");

    let urls = uploader
        .upload_files(&[
            FileUpload::new("g1.webp", "image/webp", vec![1]),
            FileUpload::new("g2.jpg", "image/jpeg", vec![2, 2]),
        ])
        .await?;
    assert_eq!(urls, ["https://cdn.test/g1.webp", "https://cdn.test/g2.jpg"]);

    let uploads = remote.uploads.lock().clone();
    assert_eq!(
        uploads,
        vec![
            ("main.png".to_string(), "image/png".to_string(), 3),
            ("g1.webp".to_string(), "image/webp".to_string(), 1),
            ("g2.jpg".to_string(), "image/jpeg".to_string(), 2),
        ]
    );

    assert!(uploader.upload_files(&[]).await?.is_empty());
    assert_eq!(remote.uploads.lock().len(), 3);
    Ok(())
}

#[tokio::test]
async fn uploader_reports_remote_failures() -> anyhow::Result<()> {
    let (base, _remote) = spawn_remote().await?;
    let uploader = HttpUploader::new(
        build_http_client(Duration::from_secs(5))?,
        &format!("{base}/broken"),
    );

    let err = uploader
        .upload_file(&FileUpload::new("main.png", "image/png", vec![1]))
        .await
        .expect_err("broken endpoint");
    assert!(matches!(err, ClientError::Api { status: 500, .. }));
    Ok(())
}
