use base64::{Engine as _, engine::general_purpose};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    medication::{ports::LLMClient, value_objects::LLMResponse},
};

#[derive(Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    model_name: String,
    text_model_name: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: ContentResponse,
}

#[derive(Debug, Default, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl GeminiLLMClient {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            api_key: config.gemini_api_key,
            model_name: config.gemini_model,
            text_model_name: config.gemini_text_model,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn generation_config(response_schema: Option<serde_json::Value>) -> Option<GenerationConfig> {
        response_schema.map(|response_schema| GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema,
        })
    }

    async fn call_gemini_api(
        &self,
        model_name: &str,
        request: GeminiRequest,
    ) -> Result<LLMResponse, CoreError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model_name);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &error_text, model_name));
        }

        let raw: serde_json::Value = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        Ok(LLMResponse::new(response_text(&raw), raw))
    }
}

/// Maps a failed `generateContent` status to a core error. Only a 404 means
/// the model identifier was rejected.
fn classify_error(status: StatusCode, error_text: &str, model_name: &str) -> CoreError {
    if status == StatusCode::NOT_FOUND {
        tracing::warn!(model = %model_name, "Gemini model not found: {}", error_text);
        return CoreError::ModelNotFound(format!(
            "models/{} ({})",
            model_name,
            error_text.trim()
        ));
    }

    tracing::error!("Gemini API error: {} - {}", status, error_text);
    CoreError::ExternalServiceError(format!(
        "LLM API returned error: {} - {}",
        status, error_text
    ))
}

/// Concatenated text parts of the first candidate, like the SDK's `.text`.
fn response_text(raw: &serde_json::Value) -> Option<String> {
    let parsed = GeminiResponse::deserialize(raw).unwrap_or_default();

    let text: String = parsed
        .candidates
        .first()?
        .content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() { None } else { Some(text) }
}

impl LLMClient for GeminiLLMClient {
    #[instrument(skip(self, prompt, image_data, response_schema), fields(model = %self.model_name))]
    async fn generate_with_image(
        &self,
        prompt: String,
        image_data: Vec<u8>,
        response_schema: Option<serde_json::Value>,
    ) -> Result<LLMResponse, CoreError> {
        let base64_image = general_purpose::STANDARD.encode(&image_data);

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: base64_image,
                        },
                    },
                ],
            }],
            generation_config: Self::generation_config(response_schema),
        };

        self.call_gemini_api(&self.model_name, request).await
    }

    #[instrument(skip(self, prompt, response_schema), fields(model = %self.text_model_name))]
    async fn generate_with_text(
        &self,
        prompt: String,
        response_schema: Option<serde_json::Value>,
    ) -> Result<LLMResponse, CoreError> {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: Self::generation_config(response_schema),
        };

        self.call_gemini_api(&self.text_model_name, request).await
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<String>, CoreError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini list models request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini list models error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let listing: ListModelsResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini model list: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse model list: {}", e))
        })?;

        Ok(listing.models.into_iter().map(|m| m.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let raw = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        assert_eq!(response_text(&raw).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_missing_candidates() {
        assert_eq!(response_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })), None);
        assert_eq!(response_text(&json!({ "candidates": [{ "finishReason": "SAFETY" }] })), None);
        assert_eq!(response_text(&json!("not an object")), None);
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: "AAAA".to_string(),
                        },
                    },
                ],
            }],
            generation_config: GeminiLLMClient::generation_config(None),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0], json!({ "text": "prompt" }));
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/jpeg"
        );
        assert!(value.get("generation_config").is_none());
    }

    #[test]
    fn test_classify_error_not_found_is_model_not_found() {
        let err = classify_error(
            StatusCode::NOT_FOUND,
            "  models/gemini-x is not found  ",
            "gemini-x",
        );
        assert_eq!(
            err,
            CoreError::ModelNotFound("models/gemini-x (models/gemini-x is not found)".to_string())
        );
    }

    #[test]
    fn test_classify_error_other_statuses_are_unclassified() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_REQUEST,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            let err = classify_error(status, "boom", "gemini-1.5-flash");
            assert!(
                matches!(&err, CoreError::ExternalServiceError(msg) if msg.contains("boom")),
                "unexpected mapping for {status}: {err:?}"
            );
        }
    }

    #[test]
    fn test_new_trims_base_url() {
        let mut config = LLMConfig::new("key".to_string());
        config.gemini_base_url = "http://localhost:8080/v1beta/".to_string();
        let client = GeminiLLMClient::new(config);
        assert_eq!(client.base_url, "http://localhost:8080/v1beta");
    }
}
