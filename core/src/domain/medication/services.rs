use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    medication::{
        entities::{
            AnalysisPath, AnalysisText, Diagnostics, MedicationAnalysisResult, MedicationRecord,
            RawOutput,
        },
        helpers::run_ocr,
        heuristics::extract_medication_fields,
        parser::{extract_raw_text, parse_model_json, raw_keys},
        ports::{LLMClient, MedicationAnalysisService, OcrEngine},
        schema::{MEDICATION_PROMPT, get_medication_schema, ocr_reparse_prompt},
        value_objects::OcrOutcome,
    },
};

/// What the OCR chain (OCR, heuristic, text-model re-parse) produced.
#[derive(Debug, Default)]
struct OcrChainOutcome {
    ocr: OcrOutcome,
    record: Option<MedicationRecord>,
    secondary_model_used: bool,
    secondary_error: Option<String>,
}

impl<LLM, OCR> Service<LLM, OCR>
where
    LLM: LLMClient,
    OCR: OcrEngine,
{
    async fn run_ocr_chain(&self, image_data: Vec<u8>) -> OcrChainOutcome {
        let ocr = run_ocr(&self.ocr_engine, image_data).await;

        let Some(ocr_text) = ocr.usable_text().map(str::to_string) else {
            return OcrChainOutcome {
                ocr,
                ..Default::default()
            };
        };

        let mut outcome = OcrChainOutcome {
            record: Some(extract_medication_fields(&ocr_text)),
            ocr,
            ..Default::default()
        };

        match self
            .llm_client
            .generate_with_text(ocr_reparse_prompt(&ocr_text), Some(get_medication_schema()))
            .await
        {
            Ok(response) => {
                let (secondary_text, _) = extract_raw_text(&response);
                match parse_model_json(&secondary_text) {
                    Some(map) => {
                        outcome.record = Some(MedicationRecord::from_model_map(&map));
                        outcome.secondary_model_used = true;
                    }
                    None => {
                        tracing::debug!("Text model reply held no JSON object, keeping heuristic");
                        outcome.secondary_error =
                            Some("text model returned no JSON object".to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Text model re-parse failed: {}", e);
                outcome.secondary_error = Some(e.to_string());
            }
        }

        outcome
    }

    async fn recover_from_missing_model(
        &self,
        error: CoreError,
        image_data: Vec<u8>,
    ) -> MedicationAnalysisResult {
        tracing::warn!("Primary model unavailable, falling back to OCR: {}", error);

        let available_models = match self.llm_client.list_models().await {
            Ok(models) => Some(models),
            Err(e) => {
                tracing::warn!("Failed to list available models: {}", e);
                None
            }
        };

        let chain = self.run_ocr_chain(image_data).await;
        let error = error.to_string();

        let text = match &chain.record {
            Some(record) => AnalysisText::Structured(record.clone()),
            None => AnalysisText::plain(error.clone()),
        };

        MedicationAnalysisResult {
            text,
            raw_output: RawOutput {
                response: None,
                raw_text: None,
                ocr_text: chain.ocr.text,
                ocr_error: chain.ocr.error,
                ocr_parsed: chain.record,
                error: Some(error),
                available_models,
            },
            diagnostics: Diagnostics {
                path: AnalysisPath::ModelNotFound,
                only_plain: true,
                ocr_attempted: true,
                secondary_model_used: chain.secondary_model_used,
                secondary_error: chain.secondary_error,
                ..Default::default()
            },
        }
    }
}

impl<LLM, OCR> MedicationAnalysisService for Service<LLM, OCR>
where
    LLM: LLMClient,
    OCR: OcrEngine,
{
    #[instrument(skip_all, fields(image_bytes = image_data.len()))]
    async fn analyze_medication(
        &self,
        image_data: Vec<u8>,
    ) -> Result<MedicationAnalysisResult, CoreError> {
        // 1. Ask the multimodal model for the structured record
        let response = match self
            .llm_client
            .generate_with_image(
                MEDICATION_PROMPT.to_string(),
                image_data.clone(),
                Some(get_medication_schema()),
            )
            .await
        {
            Ok(response) => response,
            Err(e @ CoreError::ModelNotFound(_)) => {
                return Ok(self.recover_from_missing_model(e, image_data).await);
            }
            Err(e) => {
                tracing::error!("Medication analysis failed: {}", e);
                return Err(e);
            }
        };

        // 2. Pull out the raw text and parse it
        let (raw_text, text_source) = extract_raw_text(&response);
        let has_text_attr = response
            .text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());

        let text = match parse_model_json(&raw_text) {
            Some(map) => AnalysisText::Structured(MedicationRecord::from_model_map(&map)),
            None => AnalysisText::plain(raw_text.clone()),
        };

        let only_plain = text.is_plain() || !has_text_attr;

        let mut diagnostics = Diagnostics {
            path: AnalysisPath::Primary,
            has_text_attr,
            text_source,
            raw_keys: raw_keys(&response.raw),
            only_plain,
            ..Default::default()
        };
        let mut raw_output = RawOutput {
            response: Some(response.raw),
            raw_text: Some(raw_text),
            ..Default::default()
        };

        // A named record is final; the OCR chain could not replace it
        if !only_plain || text.has_medication_name() {
            return Ok(MedicationAnalysisResult {
                text,
                raw_output,
                diagnostics,
            });
        }

        // 3. Degenerate reply: run the OCR chain on the original image
        tracing::info!("Model reply was plain text, running OCR fallback");
        let chain = self.run_ocr_chain(image_data).await;

        diagnostics.ocr_attempted = true;
        diagnostics.secondary_model_used = chain.secondary_model_used;
        diagnostics.secondary_error = chain.secondary_error;
        raw_output.ocr_text = chain.ocr.text;
        raw_output.ocr_error = chain.ocr.error;
        raw_output.ocr_parsed = chain.record.clone();

        // 4. Only a missing medication name lets the OCR record win
        let text = match chain.record {
            Some(record) if !text.has_medication_name() => {
                diagnostics.path = AnalysisPath::OcrFallback;
                AnalysisText::Structured(record)
            }
            _ => text,
        };

        Ok(MedicationAnalysisResult {
            text,
            raw_output,
            diagnostics,
        })
    }
}
