//! Wire types for the question-answering backend.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QaError, Result};

/// Multipart field name the backend expects the PDF under.
pub const UPLOAD_FIELD: &str = "file";
pub const UPLOAD_PATH: &str = "/upload";
pub const ASK_PATH: &str = "/ask";
pub const HEALTH_PATH: &str = "/health";

/// Response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: String,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub session_id: String,
    pub question: String,
}

/// Response of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body the backend attaches to 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    /// Extracts `detail` from an error body, falling back to the raw text.
    pub fn message_from(body: &str) -> String {
        serde_json::from_str::<ErrorDetail>(body)
            .map(|e| e.detail)
            .unwrap_or_else(|_| body.to_string())
    }
}

/// A file read from disk, ready to be sent as a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads the file at `path`. The extension is not checked here; the
    /// backend rejects non-PDF uploads itself.
    pub async fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                QaError::invalid_input(format!("Not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }
}
