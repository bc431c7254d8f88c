use serde_json::json;

pub const MEDICATION_PROMPT: &str = "You are reading a photo of a medication label. \
Extract the information and respond with strict JSON only, no commentary, using exactly these keys: \
medicationName (string), genericName (string), dosage (string), frequency (string), \
instructions (array of strings), warnings (array of strings), sideEffects (array of strings), \
plainLanguage (string, a short plain-English explanation of how to take the medication). \
Use an empty string or an empty array when a value is not visible on the label.";

pub const OCR_REPARSE_PROMPT: &str = "The following text was read from a medication label with OCR \
and may contain recognition errors. Extract the medication information and respond with strict \
JSON only, using exactly these keys: medicationName, genericName, dosage, frequency, \
instructions (array), warnings (array), sideEffects (array), plainLanguage. \
Use an empty string or an empty array when a value is unknown.\n\nOCR text:\n";

/// Builds the text-only prompt used to turn OCR output into a record.
pub fn ocr_reparse_prompt(ocr_text: &str) -> String {
    format!("{OCR_REPARSE_PROMPT}{ocr_text}")
}

/// Returns the JSON schema for medication label LLM responses
pub fn get_medication_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "medicationName": { "type": "string" },
            "genericName": { "type": "string" },
            "dosage": { "type": "string" },
            "frequency": { "type": "string" },
            "instructions": {
                "type": "array",
                "items": { "type": "string" }
            },
            "warnings": {
                "type": "array",
                "items": { "type": "string" }
            },
            "sideEffects": {
                "type": "array",
                "items": { "type": "string" }
            },
            "plainLanguage": { "type": "string" }
        },
        "required": [
            "medicationName", "genericName", "dosage", "frequency",
            "instructions", "warnings", "sideEffects", "plainLanguage"
        ]
    })
}
