use crate::{
    domain::common::{NutrilensConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{llm::GeminiLLMClient, ocr::TesseractOcrEngine},
};

pub type NutrilensService = Service<GeminiLLMClient, TesseractOcrEngine>;

/// Wires the Gemini and Tesseract adapters into the analysis service.
pub fn create_service(config: NutrilensConfig) -> Result<NutrilensService, CoreError> {
    if config.llm.gemini_api_key.trim().is_empty() {
        return Err(CoreError::InvalidConfiguration(
            "gemini_api_key must not be empty".to_string(),
        ));
    }

    tracing::info!(
        model = %config.llm.gemini_model,
        text_model = %config.llm.gemini_text_model,
        ocr_language = %config.ocr.language,
        "Creating analysis service"
    );

    let llm_client = GeminiLLMClient::new(config.llm);
    let ocr_engine = TesseractOcrEngine::new(config.ocr);

    Ok(Service::new(llm_client, ocr_engine))
}
