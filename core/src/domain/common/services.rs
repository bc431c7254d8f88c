/// Holds the adapters the analysis services run against.
///
/// Business logic is implemented as trait impls on this struct in each
/// domain's `services` module.
#[derive(Clone)]
pub struct Service<LLM, OCR> {
    pub(crate) llm_client: LLM,
    pub(crate) ocr_engine: OCR,
}

impl<LLM, OCR> Service<LLM, OCR> {
    pub fn new(llm_client: LLM, ocr_engine: OCR) -> Self {
        Self {
            llm_client,
            ocr_engine,
        }
    }
}
