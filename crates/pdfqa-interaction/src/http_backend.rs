//! HttpQaBackend - REST implementation of `QaBackend` on top of reqwest.
//!
//! Each call issues exactly one request. Non-success statuses and bodies that
//! do not match the expected shape are reported as errors; nothing is retried.

use async_trait::async_trait;
use pdfqa_core::QaError;
use pdfqa_core::backend::QaBackend;
use pdfqa_core::config::ClientConfig;
use pdfqa_core::error::Result;
use pdfqa_core::form::endpoint;
use pdfqa_core::protocol::{
    ASK_PATH, AskRequest, AskResponse, ErrorDetail, HEALTH_PATH, HealthResponse, PdfUpload,
    UPLOAD_FIELD, UPLOAD_PATH, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const PDF_MIME: &str = "application/pdf";

/// Backend client that talks to the question-answering service over HTTP.
#[derive(Clone, Default)]
pub struct HttpQaBackend {
    client: Client,
}

impl HttpQaBackend {
    /// Creates a backend with no request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| QaError::config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_timeout(config.request_timeout())
    }
}

#[async_trait]
impl QaBackend for HttpQaBackend {
    async fn upload(&self, base_url: &str, upload: PdfUpload) -> Result<UploadResponse> {
        let url = endpoint(base_url, UPLOAD_PATH);
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(PDF_MIME)
            .map_err(|err| QaError::invalid_input(format!("Invalid upload part: {err}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(%url, size, "POST upload");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(&url, err))?;

        read_json(response, &url).await
    }

    async fn ask(&self, base_url: &str, request: &AskRequest) -> Result<AskResponse> {
        let url = endpoint(base_url, ASK_PATH);

        debug!(%url, "POST ask");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error(&url, err))?;

        read_json(response, &url).await
    }

    async fn health(&self, base_url: &str) -> Result<HealthResponse> {
        let url = endpoint(base_url, HEALTH_PATH);

        debug!(%url, "GET health");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| transport_error(&url, err))?;

        read_json(response, &url).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        return Err(map_http_error(status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| QaError::decode(format!("Failed to parse response from {url}: {err}")))
}

fn transport_error(url: &str, err: reqwest::Error) -> QaError {
    if err.is_timeout() {
        QaError::transport(format!("Request to {url} timed out: {err}"))
    } else {
        QaError::transport(format!("Request to {url} failed: {err}"))
    }
}

fn map_http_error(status: StatusCode, body: &str) -> QaError {
    QaError::http(status.as_u16(), ErrorDetail::message_from(body))
}
