use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;

use super::{ClientError, ClientResult, handle_response, join_url};
use crate::models::FileUpload;

/// Remote file storage. Returns public URLs for uploaded files.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload_file(&self, file: &FileUpload) -> ClientResult<String>;

    /// URLs come back in the order the files were given.
    async fn upload_files(&self, files: &[FileUpload]) -> ClientResult<Vec<String>>;
}

#[derive(Deserialize)]
struct UploadedFile {
    url: String,
}

#[derive(Deserialize)]
struct UploadedFiles {
    urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    upload_url: String,
}

impl HttpUploader {
    pub fn new(client: Client, upload_url: &str) -> Self {
        Self {
            client,
            upload_url: upload_url.trim_end_matches('/').to_string(),
        }
    }
}

fn file_part(file: &FileUpload) -> ClientResult<Part> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?)
}

#[async_trait]
impl FileUploader for HttpUploader {
    async fn upload_file(&self, file: &FileUpload) -> ClientResult<String> {
        let form = Form::new().part("file", file_part(file)?);
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadedFile = handle_response(response).await?;
        Ok(uploaded.url)
    }

    async fn upload_files(&self, files: &[FileUpload]) -> ClientResult<Vec<String>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file)?);
        }
        let response = self
            .client
            .post(join_url(&self.upload_url, "multiple"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadedFiles = handle_response(response).await?;
        if uploaded.urls.len() != files.len() {
            return Err(ClientError::InvalidResponse(format!(
                "expected {} urls, got {}",
                files.len(),
                uploaded.urls.len()
            )));
        }
        Ok(uploaded.urls)
    }
}
