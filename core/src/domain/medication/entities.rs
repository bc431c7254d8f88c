use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured reading of a medication label.
///
/// Every field is always present; unknown values are empty strings or empty
/// lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationRecord {
    pub medication_name: String,
    pub generic_name: String,
    pub dosage: String,
    pub frequency: String,
    pub instructions: Vec<String>,
    pub warnings: Vec<String>,
    pub side_effects: Vec<String>,
    pub plain_language: String,
}

impl MedicationRecord {
    /// Normalizes an arbitrary JSON object returned by a model into the fixed
    /// record shape. Unknown keys are ignored, missing keys become empty.
    pub fn from_model_map(map: &Map<String, Value>) -> Self {
        Self {
            medication_name: scalar_field(map, &["medicationName", "medication_name"]),
            generic_name: scalar_field(map, &["genericName", "generic_name"]),
            dosage: scalar_field(map, &["dosage"]),
            frequency: scalar_field(map, &["frequency"]),
            instructions: list_field(map, &["instructions"]),
            warnings: list_field(map, &["warnings"]),
            side_effects: list_field(map, &["sideEffects", "side_effects"]),
            plain_language: scalar_field(map, &["plainLanguage", "plain_language"]),
        }
    }

    pub fn has_medication_name(&self) -> bool {
        !self.medication_name.trim().is_empty()
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn scalar_field(map: &Map<String, Value>, keys: &[&str]) -> String {
    lookup(map, keys).map(value_to_string).unwrap_or_default()
}

fn list_field(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match lookup(map, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            let single = value_to_string(other);
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    }
}

/// The `text` part of an analysis: either a structured record or the raw
/// model text when nothing structured could be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisText {
    Plain { plain: String },
    Structured(MedicationRecord),
}

impl AnalysisText {
    pub fn plain(text: impl Into<String>) -> Self {
        AnalysisText::Plain { plain: text.into() }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, AnalysisText::Plain { .. })
    }

    pub fn record(&self) -> Option<&MedicationRecord> {
        match self {
            AnalysisText::Structured(record) => Some(record),
            AnalysisText::Plain { .. } => None,
        }
    }

    pub fn has_medication_name(&self) -> bool {
        self.record()
            .map(MedicationRecord::has_medication_name)
            .unwrap_or(false)
    }
}

/// Everything collected along the way, kept for debugging on the client.
/// All keys are always serialized, absent values as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawOutput {
    pub response: Option<Value>,
    pub raw_text: Option<String>,
    pub ocr_text: Option<String>,
    pub ocr_error: Option<String>,
    pub ocr_parsed: Option<MedicationRecord>,
    pub error: Option<String>,
    pub available_models: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPath {
    #[default]
    Primary,
    OcrFallback,
    ModelNotFound,
}

/// Where the raw model text was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    Attribute,
    NestedSearch,
    Repr,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub path: AnalysisPath,
    pub has_text_attr: bool,
    pub text_source: TextSource,
    pub raw_keys: Vec<String>,
    pub only_plain: bool,
    pub ocr_attempted: bool,
    pub secondary_model_used: bool,
    pub secondary_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationAnalysisResult {
    pub text: AnalysisText,
    pub raw_output: RawOutput,
    pub diagnostics: Diagnostics,
}
