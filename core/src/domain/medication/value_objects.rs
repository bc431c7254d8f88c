use serde_json::Value;

/// A generative model response as the core sees it.
///
/// `text` mirrors the SDK-style `.text` accessor (concatenated text parts of
/// the first candidate). `raw` keeps the full decoded response body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LLMResponse {
    pub text: Option<String>,
    pub raw: Value,
}

impl LLMResponse {
    pub fn new(text: Option<String>, raw: Value) -> Self {
        Self { text, raw }
    }
}

/// Result of running the OCR fallback. Exactly one of the two fields is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OcrOutcome {
    pub text: Option<String>,
    pub error: Option<String>,
}

impl OcrOutcome {
    /// OCR text worth feeding to the extractors, if any.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}
