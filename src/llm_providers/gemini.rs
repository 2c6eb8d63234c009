use super::{GenerationRequest, LLMProvider, LLMProviderConfig};
use crate::error::{ReqscribeError, Result};
use crate::log_debug;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// Represents the Gemini `generateContent` endpoint
pub struct GeminiProvider {
    config: LLMProviderConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new instance of `GeminiProvider` with the given configuration
    pub fn new(config: LLMProviderConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body: instruction first, then one inline-data part per file
    pub fn request_body(request: &GenerationRequest) -> Value {
        let mut parts = vec![json!({ "text": request.instruction })];
        parts.extend(request.attachments.iter().map(|file| {
            json!({
                "inlineData": {
                    "mimeType": file.media_type,
                    "data": file.payload
                }
            })
        }));

        let mut body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": parts
                }
            ]
        });

        if let Some(schema) = &request.response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }

        body
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = Self::request_body(request);
        log_debug!(
            "Sending request to Gemini model {} with {} attachment(s)",
            self.config.model,
            request.attachments.len()
        );

        let call = async {
            let response = self
                .client
                .post(self.endpoint())
                .header("Content-Type", "application/json")
                .header("x-goog-api-key", &self.config.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ReqscribeError::Communication(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(ReqscribeError::Communication(format!(
                    "Gemini API request failed with status {status}: {text}"
                )));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| ReqscribeError::Communication(format!("unreadable response body: {e}")))
        };

        let response_body = tokio::time::timeout(self.config.timeout, call)
            .await
            .map_err(|_| {
                ReqscribeError::Communication(format!(
                    "no response within {} seconds",
                    self.config.timeout.as_secs()
                ))
            })??;

        extract_text(&response_body)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

/// Pull the generated text out of a `generateContent` response
///
/// ```text
/// { "candidates": [ { "content": { "parts": [ { "text": "..." } ] } } ] }
/// ```
fn extract_text(response_body: &Value) -> Result<String> {
    let parts = response_body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            let reason = response_body["promptFeedback"]["blockReason"]
                .as_str()
                .map_or_else(
                    || "response contained no candidates".to_string(),
                    |r| format!("request was blocked ({r})"),
                );
            ReqscribeError::ResponseParse(reason)
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(ReqscribeError::ResponseParse(
            "response contained no text".to_string(),
        ));
    }

    Ok(text)
}
