use crate::domain::medication::{ports::OcrEngine, value_objects::OcrOutcome};

/// Runs the OCR engine once and folds any failure into the outcome.
pub async fn run_ocr<O: OcrEngine>(ocr_engine: &O, image_data: Vec<u8>) -> OcrOutcome {
    match ocr_engine.recognize(image_data).await {
        Ok(text) => {
            tracing::debug!(chars = text.len(), "OCR produced text");
            OcrOutcome {
                text: Some(text),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!("OCR fallback failed: {}", e);
            OcrOutcome {
                text: None,
                error: Some(e.to_string()),
            }
        }
    }
}
