//! Error types for the fan-out engine.

use thiserror::Error;

/// Errors raised by the fan-out engine.
///
/// Only `Persistence` and `Validation` ever reach a caller: persistence
/// failures abort the pipeline before any notification is attempted, and
/// validation failures come from the synchronous entry points. The other
/// variants are caught inside the fan-out and logged.
#[derive(Error, Debug)]
pub enum BroadcastError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] storage::StorageError),

    #[error("Recipient resolution failed: {0}")]
    Resolution(String),

    #[error("Message formatting failed: {0}")]
    Formatting(String),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}
