use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::medication::entities::TextSource;

/// Free-text food analysis. The model's answer is returned as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysisResult {
    pub text: String,
    pub raw_output: Value,
    pub diagnostics: FoodDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoodDiagnostics {
    pub has_text_attr: bool,
    pub text_source: TextSource,
    pub raw_keys: Vec<String>,
}
