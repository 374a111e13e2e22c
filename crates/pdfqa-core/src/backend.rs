//! Transport trait for the question-answering backend.

use crate::error::Result;
use crate::protocol::{AskRequest, AskResponse, HealthResponse, PdfUpload, UploadResponse};

/// The remote service that ingests PDFs and answers questions about them.
///
/// `base_url` is passed on every call because the user may change it
/// between requests. Implementations must not retry.
#[async_trait::async_trait]
pub trait QaBackend: Send + Sync {
    /// `POST {base_url}/upload` with the file as multipart field `file`.
    async fn upload(&self, base_url: &str, upload: PdfUpload) -> Result<UploadResponse>;

    /// `POST {base_url}/ask` with a JSON body.
    async fn ask(&self, base_url: &str, request: &AskRequest) -> Result<AskResponse>;

    /// `GET {base_url}/health`.
    async fn health(&self, base_url: &str) -> Result<HealthResponse>;
}
