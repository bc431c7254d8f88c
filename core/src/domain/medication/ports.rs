use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    medication::{entities::MedicationAnalysisResult, value_objects::LLMResponse},
};

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Calls the multimodal model with a prompt and a JPEG image.
    ///
    /// Fails with `CoreError::ModelNotFound` when the configured model
    /// identifier is rejected by the service.
    fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        response_schema: Option<serde_json::Value>,
    ) -> impl Future<Output = Result<LLMResponse, CoreError>> + Send;

    /// Calls the text-only model.
    fn generate_with_text(
        &self,
        prompt: String,
        response_schema: Option<serde_json::Value>,
    ) -> impl Future<Output = Result<LLMResponse, CoreError>> + Send;

    /// Lists the model names the service currently exposes.
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>, CoreError>> + Send;
}

/// OCR engine turning an encoded image into text
#[cfg_attr(test, mockall::automock)]
pub trait OcrEngine: Send + Sync {
    fn recognize(
        &self,
        image_data: Vec<u8>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for medication label analysis
pub trait MedicationAnalysisService: Send + Sync {
    /// Never fails for an unknown primary model; only unclassified errors
    /// from the primary model call are returned.
    fn analyze_medication(
        &self,
        image_data: Vec<u8>,
    ) -> impl Future<Output = Result<MedicationAnalysisResult, CoreError>> + Send;
}
