//! Upload and ask handlers.
//!
//! `QaController` owns the only shared mutable client state: the session
//! slot and the two display areas. Handlers may run concurrently; each one
//! locks the state only to read preconditions and to write its result, never
//! across a request. Overlapping requests therefore resolve in arrival order
//! and the last response wins.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info};

use crate::backend::QaBackend;
use crate::error::QaError;
use crate::form::FormInputs;
use crate::protocol::{AskRequest, PdfUpload};
use crate::session::{SessionId, SessionSlot};

pub const SELECT_PDF_ALERT: &str = "Please select a PDF first.";
pub const UPLOAD_FIRST_ALERT: &str = "Upload a PDF first.";
pub const UPLOADING_STATUS: &str = "Uploading and processing PDF...";
pub const UPLOAD_FAILED_STATUS: &str = "Upload failed. Check console.";
pub const THINKING_ANSWER: &str = "Thinking...";
pub const ASK_FAILED_ANSWER: &str = "Error calling backend. Check console.";
pub const HEALTH_FAILED_STATUS: &str = "Backend unreachable. Check console.";

/// Text currently shown in the status and answer areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Display {
    pub status: String,
    pub answer: String,
}

/// What a handler did in response to a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// A precondition failed; the message must be shown to the user right away.
    Alert(String),
    /// Nothing to do (blank question).
    NoOp,
    /// The request succeeded and the display was updated.
    Completed,
    /// The request failed; the display shows a fixed failure message.
    Failed,
}

/// The display area a write landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayArea {
    Status,
    Answer,
}

/// One write to a display area.
///
/// Sent for every write, including writes that repeat the current text, so a
/// renderer shows each completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub area: DisplayArea,
    pub text: String,
}

/// Point-in-time copy of the client state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub display: Display,
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Default)]
struct ClientState {
    session: SessionSlot,
    display: Display,
}

impl ClientState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.display.clone(),
            session_id: self.session.current().cloned(),
        }
    }
}

/// Wires user triggers to backend requests.
pub struct QaController<B: QaBackend> {
    backend: Arc<B>,
    state: Mutex<ClientState>,
    events: Option<mpsc::UnboundedSender<UiEvent>>,
}

impl<B: QaBackend> QaController<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Mutex::new(ClientState::default()),
            events: None,
        }
    }

    /// Sends a `UiEvent` to `sender` for every display write.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<UiEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Writes a display area and notifies the renderer. Call with the state lock held
    /// so events leave in the same order as the writes.
    fn show(&self, state: &mut ClientState, area: DisplayArea, text: String) {
        match area {
            DisplayArea::Status => state.display.status = text.clone(),
            DisplayArea::Answer => state.display.answer = text.clone(),
        }
        if let Some(events) = &self.events {
            // A dropped renderer only means nobody is watching.
            let _ = events.send(UiEvent { area, text });
        }
    }

    /// Uploads the selected file and stores the returned session id.
    ///
    /// On failure the session slot keeps whatever it held before.
    pub async fn upload(&self, form: &FormInputs) -> HandlerOutcome {
        let Some(path) = form.selected_file.as_deref() else {
            return HandlerOutcome::Alert(SELECT_PDF_ALERT.to_string());
        };
        let base_url = form.base_url();

        {
            let mut state = self.state.lock().await;
            self.show(&mut state, DisplayArea::Status, UPLOADING_STATUS.to_string());
            self.show(&mut state, DisplayArea::Answer, String::new());
        }

        debug!(base_url, file = %path.display(), "Uploading PDF");
        let result = match PdfUpload::read(path).await {
            Ok(upload) => self.backend.upload(base_url, upload).await,
            Err(err) => Err(err),
        };
        // An empty id would never satisfy the ask precondition.
        let result = result.and_then(|response| {
            if response.session_id.is_empty() {
                Err(QaError::decode("Upload response has an empty session_id"))
            } else {
                Ok(SessionId::from(response.session_id))
            }
        });

        let mut state = self.state.lock().await;
        match result {
            Ok(session_id) => {
                info!(session_id = %session_id, "PDF uploaded");
                let status = format!("PDF uploaded. Session ID: {session_id}");
                self.show(&mut state, DisplayArea::Status, status);
                state.session.set(session_id);
                HandlerOutcome::Completed
            }
            Err(err) => {
                error!(error = %err, status = err.status(), base_url, "Upload failed");
                self.show(&mut state, DisplayArea::Status, UPLOAD_FAILED_STATUS.to_string());
                HandlerOutcome::Failed
            }
        }
    }

    /// Asks the backend a question about the current session's document.
    pub async fn ask(&self, form: &FormInputs) -> HandlerOutcome {
        let session_id = self.state.lock().await.session.current().cloned();
        let Some(session_id) = session_id else {
            return HandlerOutcome::Alert(UPLOAD_FIRST_ALERT.to_string());
        };
        let Some(question) = form.trimmed_question() else {
            return HandlerOutcome::NoOp;
        };
        let base_url = form.base_url();

        {
            let mut state = self.state.lock().await;
            self.show(&mut state, DisplayArea::Answer, THINKING_ANSWER.to_string());
        }

        let request = AskRequest {
            session_id: session_id.as_str().to_string(),
            question: question.to_string(),
        };
        debug!(base_url, session_id = %session_id, "Asking question");
        let result = self.backend.ask(base_url, &request).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                self.show(&mut state, DisplayArea::Answer, response.answer);
                HandlerOutcome::Completed
            }
            Err(err) => {
                error!(error = %err, status = err.status(), base_url, "Ask failed");
                self.show(&mut state, DisplayArea::Answer, ASK_FAILED_ANSWER.to_string());
                HandlerOutcome::Failed
            }
        }
    }

    /// Probes the backend's health endpoint and reports it in the status area.
    pub async fn health(&self, form: &FormInputs) -> HandlerOutcome {
        let base_url = form.base_url();
        let result = self.backend.health(base_url).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(response) => {
                let status = format!("Backend status: {}", response.status);
                self.show(&mut state, DisplayArea::Status, status);
                HandlerOutcome::Completed
            }
            Err(err) => {
                error!(error = %err, status = err.status(), base_url, "Health check failed");
                self.show(&mut state, DisplayArea::Status, HEALTH_FAILED_STATUS.to_string());
                HandlerOutcome::Failed
            }
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{QaError, Result};
    use crate::protocol::{AskResponse, HealthResponse, UploadResponse};
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Upload { base_url: String, file_name: String },
        Ask { base_url: String, request: AskRequest },
        Health { base_url: String },
    }

    /// In-memory backend that records every call it receives.
    #[derive(Default)]
    struct FakeBackend {
        calls: StdMutex<Vec<Call>>,
        session_ids: StdMutex<Vec<String>>,
        answer: Option<String>,
        fail: bool,
    }

    impl FakeBackend {
        fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.to_string()),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn with_sessions(mut self, ids: &[&str]) -> Self {
            self.session_ids = StdMutex::new(ids.iter().rev().map(|s| s.to_string()).collect());
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl QaBackend for FakeBackend {
        async fn upload(&self, base_url: &str, upload: PdfUpload) -> Result<UploadResponse> {
            self.calls.lock().unwrap().push(Call::Upload {
                base_url: base_url.to_string(),
                file_name: upload.file_name,
            });
            if self.fail {
                return Err(QaError::transport("connection refused"));
            }
            let session_id = self
                .session_ids
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "abc123".to_string());
            Ok(UploadResponse { session_id })
        }

        async fn ask(&self, base_url: &str, request: &AskRequest) -> Result<AskResponse> {
            self.calls.lock().unwrap().push(Call::Ask {
                base_url: base_url.to_string(),
                request: request.clone(),
            });
            match (&self.answer, self.fail) {
                (Some(answer), false) => Ok(AskResponse {
                    answer: answer.clone(),
                }),
                _ => Err(QaError::transport("connection refused")),
            }
        }

        async fn health(&self, base_url: &str) -> Result<HealthResponse> {
            self.calls.lock().unwrap().push(Call::Health {
                base_url: base_url.to_string(),
            });
            if self.fail {
                return Err(QaError::transport("connection refused"));
            }
            Ok(HealthResponse {
                status: "ok".to_string(),
            })
        }
    }

    fn pdf_on_disk(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("invoice.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    fn form_with_file(path: PathBuf) -> FormInputs {
        FormInputs {
            backend_url: "http://localhost:8000/".to_string(),
            selected_file: Some(path),
            question: String::new(),
        }
    }

    #[tokio::test]
    async fn test_upload_without_file_alerts_and_sends_nothing() {
        let backend = Arc::new(FakeBackend::answering("unused"));
        let controller = QaController::new(backend.clone());

        let outcome = controller.upload(&FormInputs::new("http://localhost:8000")).await;

        assert_eq!(outcome, HandlerOutcome::Alert(SELECT_PDF_ALERT.to_string()));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_stores_session_and_reports_status() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("unused"));
        let controller = QaController::new(backend.clone());

        let outcome = controller.upload(&form_with_file(pdf_on_disk(&dir))).await;

        assert_eq!(outcome, HandlerOutcome::Completed);
        assert_eq!(
            backend.calls(),
            vec![Call::Upload {
                base_url: "http://localhost:8000".to_string(),
                file_name: "invoice.pdf".to_string(),
            }]
        );
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.session_id, Some(SessionId::new("abc123")));
        assert_eq!(snapshot.display.status, "PDF uploaded. Session ID: abc123");
        assert_eq!(snapshot.display.answer, "");
    }

    #[tokio::test]
    async fn test_ask_without_session_alerts_and_sends_nothing() {
        let backend = Arc::new(FakeBackend::answering("$42"));
        let controller = QaController::new(backend.clone());
        let mut form = FormInputs::new("http://localhost:8000");
        form.question = "What is the total?".to_string();

        let outcome = controller.ask(&form).await;

        assert_eq!(outcome, HandlerOutcome::Alert(UPLOAD_FIRST_ALERT.to_string()));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ask_sends_session_and_question_then_shows_answer() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("$42"));
        let controller = QaController::new(backend.clone());
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;

        form.question = "What is the total?".to_string();
        let outcome = controller.ask(&form).await;

        assert_eq!(outcome, HandlerOutcome::Completed);
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::Ask {
                base_url: "http://localhost:8000".to_string(),
                request: AskRequest {
                    session_id: "abc123".to_string(),
                    question: "What is the total?".to_string(),
                },
            }
        );
        assert_eq!(controller.snapshot().await.display.answer, "$42");
    }

    #[tokio::test]
    async fn test_ask_trims_question_before_sending() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("yes"));
        let controller = QaController::new(backend.clone());
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;

        form.question = "   Is it signed?\n".to_string();
        controller.ask(&form).await;

        match backend.calls().last() {
            Some(Call::Ask { request, .. }) => assert_eq!(request.question, "Is it signed?"),
            other => panic!("Expected ask call, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_question_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("unused"));
        let controller = QaController::new(backend.clone());
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;
        let before = controller.snapshot().await;

        form.question = " \t ".to_string();
        let outcome = controller.ask(&form).await;

        assert_eq!(outcome, HandlerOutcome::NoOp);
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(controller.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_previous_session() {
        let dir = TempDir::new().unwrap();
        let good = Arc::new(FakeBackend::answering("unused"));
        let controller = QaController::new(good);
        let form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;

        // A missing file fails before any request is made.
        let missing = form_with_file(dir.path().join("gone.pdf"));
        let outcome = controller.upload(&missing).await;

        assert_eq!(outcome, HandlerOutcome::Failed);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.display.status, UPLOAD_FAILED_STATUS);
        assert_eq!(snapshot.session_id, Some(SessionId::new("abc123")));
    }

    #[tokio::test]
    async fn test_network_failure_on_upload_shows_fixed_status() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::failing());
        let controller = QaController::new(backend.clone());

        let outcome = controller.upload(&form_with_file(pdf_on_disk(&dir))).await;

        assert_eq!(outcome, HandlerOutcome::Failed);
        assert_eq!(backend.calls().len(), 1);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.display.status, UPLOAD_FAILED_STATUS);
        assert!(snapshot.session_id.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_on_ask_shows_fixed_answer() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::default());
        let controller = QaController::new(backend);
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;

        form.question = "What is the total?".to_string();
        let outcome = controller.ask(&form).await;

        assert_eq!(outcome, HandlerOutcome::Failed);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.display.answer, ASK_FAILED_ANSWER);
        assert_eq!(snapshot.session_id, Some(SessionId::new("abc123")));
    }

    #[tokio::test]
    async fn test_second_upload_overwrites_session() {
        let dir = TempDir::new().unwrap();
        let backend =
            Arc::new(FakeBackend::answering("ok").with_sessions(&["first", "second"]));
        let controller = QaController::new(backend.clone());
        let mut form = form_with_file(pdf_on_disk(&dir));

        controller.upload(&form).await;
        controller.upload(&form).await;
        form.question = "Who signed it?".to_string();
        controller.ask(&form).await;

        match backend.calls().last() {
            Some(Call::Ask { request, .. }) => assert_eq!(request.session_id, "second"),
            other => panic!("Expected ask call, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_clears_previous_answer() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("$42"));
        let controller = QaController::new(backend);
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;
        form.question = "What is the total?".to_string();
        controller.ask(&form).await;

        controller.upload(&form).await;

        assert_eq!(controller.snapshot().await.display.answer, "");
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = events.try_recv() {
            drained.push(event);
        }
        drained
    }

    fn event(area: DisplayArea, text: &str) -> UiEvent {
        UiEvent {
            area,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_write_emits_an_event_in_order() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller =
            QaController::new(Arc::new(FakeBackend::answering("$42"))).with_events(tx);
        let mut form = form_with_file(pdf_on_disk(&dir));

        controller.upload(&form).await;
        form.question = "What is the total?".to_string();
        controller.ask(&form).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                event(DisplayArea::Status, UPLOADING_STATUS),
                event(DisplayArea::Answer, ""),
                event(DisplayArea::Status, "PDF uploaded. Session ID: abc123"),
                event(DisplayArea::Answer, THINKING_ANSWER),
                event(DisplayArea::Answer, "$42"),
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_health_results_each_emit_an_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = QaController::new(Arc::new(FakeBackend::default())).with_events(tx);
        let form = FormInputs::new("http://localhost:8000");

        controller.health(&form).await;
        controller.health(&form).await;

        let ok = event(DisplayArea::Status, "Backend status: ok");
        assert_eq!(drain(&mut rx), vec![ok.clone(), ok]);
    }

    #[tokio::test]
    async fn test_repeated_answers_each_emit_an_event() {
        let dir = TempDir::new().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller =
            QaController::new(Arc::new(FakeBackend::answering("$42"))).with_events(tx);
        let mut form = form_with_file(pdf_on_disk(&dir));
        controller.upload(&form).await;
        drain(&mut rx);

        form.question = "What is the total?".to_string();
        controller.ask(&form).await;
        controller.ask(&form).await;

        let answers: Vec<UiEvent> = drain(&mut rx)
            .into_iter()
            .filter(|e| e.text == "$42")
            .collect();
        assert_eq!(answers.len(), 2);
    }

    #[tokio::test]
    async fn test_noop_and_alerts_emit_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = QaController::new(Arc::new(FakeBackend::default())).with_events(tx);
        let mut form = FormInputs::new("http://localhost:8000");
        form.question = "What is the total?".to_string();

        controller.upload(&form).await;
        controller.ask(&form).await;

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(FakeBackend::answering("$42").with_sessions(&[""]));
        let controller = QaController::new(backend.clone());
        let mut form = form_with_file(pdf_on_disk(&dir));

        let outcome = controller.upload(&form).await;

        assert_eq!(outcome, HandlerOutcome::Failed);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.display.status, UPLOAD_FAILED_STATUS);
        assert!(snapshot.session_id.is_none());

        form.question = "What is the total?".to_string();
        assert_eq!(
            controller.ask(&form).await,
            HandlerOutcome::Alert(UPLOAD_FIRST_ALERT.to_string())
        );
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_health_reports_status() {
        let backend = Arc::new(FakeBackend::default());
        let controller = QaController::new(backend.clone());

        let outcome = controller.health(&FormInputs::new("http://localhost:8000/")).await;

        assert_eq!(outcome, HandlerOutcome::Completed);
        assert_eq!(
            backend.calls(),
            vec![Call::Health {
                base_url: "http://localhost:8000".to_string()
            }]
        );
        assert_eq!(controller.snapshot().await.display.status, "Backend status: ok");
    }

    #[tokio::test]
    async fn test_health_failure_leaves_session_alone() {
        let controller = QaController::new(Arc::new(FakeBackend::failing()));

        let outcome = controller.health(&FormInputs::new("http://nowhere")).await;

        assert_eq!(outcome, HandlerOutcome::Failed);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.display.status, HEALTH_FAILED_STATUS);
        assert!(snapshot.session_id.is_none());
    }
}
