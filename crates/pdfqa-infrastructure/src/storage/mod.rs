//! Storage layer for client configuration.

mod config_storage;

pub use config_storage::{ConfigStorage, ConfigStorageError};
