//! User-editable inputs.
//!
//! These mirror the three fields a user fills in: backend URL, selected file
//! and question. None of them are persisted; handlers read them fresh on
//! every request.

use std::path::PathBuf;

/// Snapshot of the input fields at the moment a handler is triggered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    /// Raw text of the backend URL field.
    pub backend_url: String,
    /// File picked for upload.
    pub selected_file: Option<PathBuf>,
    /// Raw text of the question box.
    pub question: String,
}

impl FormInputs {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    /// Backend URL with a single trailing slash removed.
    pub fn base_url(&self) -> &str {
        normalized_base_url(&self.backend_url)
    }

    /// Question text trimmed of surrounding whitespace, `None` when blank.
    pub fn trimmed_question(&self) -> Option<&str> {
        let trimmed = self.question.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Strips exactly one trailing `/` from a user-supplied base URL.
pub fn normalized_base_url(raw: &str) -> &str {
    raw.strip_suffix('/').unwrap_or(raw)
}

/// Joins a normalized base URL and an absolute endpoint path.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}
