use std::any::Any;

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("asset error: {0}")]
    Asset(String),
    #[error("generation failed: {0}")]
    Failed(String),
}

/// Failures reported by an [`AssetLocator`](crate::locator::AssetLocator).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("asset locator is not configured")]
    Unconfigured,
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("failed to sign url: {0}")]
    Signing(String),
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}
