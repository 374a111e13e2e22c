pub mod paths;
pub mod storage;

pub use crate::paths::PdfqaPaths;
pub use crate::storage::{ConfigStorage, ConfigStorageError};
