pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod protocol;
pub mod session;

// Re-export common types
pub use backend::QaBackend;
pub use controller::{Display, DisplayArea, HandlerOutcome, QaController, Snapshot, UiEvent};
pub use error::QaError;
pub use form::FormInputs;
pub use session::{SessionId, SessionSlot};
