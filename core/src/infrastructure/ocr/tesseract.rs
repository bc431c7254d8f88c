use tracing::instrument;

use crate::domain::{
    common::{OcrConfig, entities::app_errors::CoreError},
    medication::ports::OcrEngine,
};

/// Tesseract-backed OCR engine.
///
/// Without the `ocr` feature the engine is compiled as a stub that reports
/// itself unavailable, so the crate builds on machines without
/// leptonica/tesseract installed.
#[derive(Debug, Clone)]
pub struct TesseractOcrEngine {
    config: OcrConfig,
}

impl TesseractOcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl OcrEngine for TesseractOcrEngine {
    #[instrument(skip(self, image_data), fields(lang = %self.config.language, bytes = image_data.len()))]
    async fn recognize(&self, image_data: Vec<u8>) -> Result<String, CoreError> {
        if image_data.is_empty() {
            return Err(CoreError::OcrFailed("empty image buffer".to_string()));
        }

        let config = self.config.clone();
        tokio::task::spawn_blocking(move || recognize_blocking(&config, &image_data))
            .await
            .map_err(|e| {
                tracing::error!("OCR task panicked or was cancelled: {}", e);
                CoreError::OcrFailed(format!("OCR task failed: {}", e))
            })?
    }
}

#[cfg(feature = "ocr")]
fn recognize_blocking(config: &OcrConfig, image_data: &[u8]) -> Result<String, CoreError> {
    use leptess::LepTess;

    let mut engine = LepTess::new(config.data_path.as_deref(), &config.language).map_err(|e| {
        tracing::error!("Tesseract init failed: {}", e);
        CoreError::OcrUnavailable(format!("tesseract init: {}", e))
    })?;

    engine.set_image_from_mem(image_data).map_err(|e| {
        tracing::warn!("Tesseract could not decode image: {}", e);
        CoreError::OcrFailed(format!("image decode: {}", e))
    })?;

    let text = engine.get_utf8_text().map_err(|e| {
        tracing::warn!("Tesseract text extraction failed: {}", e);
        CoreError::OcrFailed(format!("tesseract run: {}", e))
    })?;

    tracing::debug!(chars = text.len(), "Tesseract recognized text");
    Ok(text)
}

#[cfg(not(feature = "ocr"))]
fn recognize_blocking(_config: &OcrConfig, _image_data: &[u8]) -> Result<String, CoreError> {
    Err(CoreError::OcrUnavailable(
        "OCR feature not enabled; build with --features ocr and install Tesseract/Leptonica"
            .to_string(),
    ))
}
