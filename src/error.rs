use thiserror::Error;

/// Camera or microphone could not be acquired
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Device unavailable: {0}")]
    Unavailable(String),
}

/// Face-detection backend failed to initialize
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetectorError {
    #[error("Failed to load model: {0}")]
    ModelLoad(String),
}

/// Errors surfaced by the sampling loop lifecycle
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Could not access camera and microphone: {0}")]
    Acquisition(#[from] CaptureError),
    #[error("Failed to load face detection models: {0}")]
    ModelLoad(#[from] DetectorError),
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

/// Durable storage failures. Always recovered inside the history store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
