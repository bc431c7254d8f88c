use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
