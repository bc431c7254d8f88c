use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    food_analysis::{
        entities::{FoodAnalysisResult, FoodDiagnostics},
        ports::FoodAnalysisService,
        schema::FOOD_PROMPT,
    },
    medication::{
        parser::{extract_raw_text, raw_keys},
        ports::{LLMClient, OcrEngine},
    },
};

impl<LLM, OCR> FoodAnalysisService for Service<LLM, OCR>
where
    LLM: LLMClient,
    OCR: OcrEngine,
{
    #[instrument(skip_all, fields(image_bytes = image_data.len()))]
    async fn analyze_food(&self, image_data: Vec<u8>) -> Result<FoodAnalysisResult, CoreError> {
        let response = self
            .llm_client
            .generate_with_image(FOOD_PROMPT.to_string(), image_data, None)
            .await
            .inspect_err(|e| tracing::error!("Food analysis failed: {}", e))?;

        let (text, text_source) = extract_raw_text(&response);
        let diagnostics = FoodDiagnostics {
            has_text_attr: response
                .text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty()),
            text_source,
            raw_keys: raw_keys(&response.raw),
        };

        Ok(FoodAnalysisResult {
            text,
            raw_output: response.raw,
            diagnostics,
        })
    }
}
