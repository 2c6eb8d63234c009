use crate::config::Config;
use crate::encoder::EncodedFile;
use crate::error::{ReqscribeError, Result};
use crate::llm_providers::{GeminiProvider, GenerationRequest, LLMProvider};
use crate::prompt::{create_instruction, create_plain_instruction, response_schema};
use crate::types::{FormattedResult, GenerationOutput};
use crate::{log_debug, log_error};
use tracing::Instrument;

/// Which shape of answer to ask the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    /// Markdown document plus itemized requirement list, as schema-checked JSON
    #[default]
    Structured,
    /// Markdown document only
    PlainText,
}

/// Generation client: composes the prompt, makes the call, and types the answer
///
/// Built once at startup and shared by reference. Each `generate*` call makes
/// exactly one request to the provider and never retries.
pub struct RequirementsClient {
    provider: Box<dyn LLMProvider>,
}

impl RequirementsClient {
    pub fn new(provider: Box<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// Build a client backed by Gemini from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider_config = config.provider_config()?;
        Ok(Self::new(Box::new(GeminiProvider::new(provider_config))))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generate a requirements document and its itemized breakdown
    pub async fn generate(&self, text: &str, files: &[EncodedFile]) -> Result<FormattedResult> {
        ensure_input(text, files)?;

        let request = GenerationRequest {
            instruction: create_instruction(text, !files.is_empty()),
            attachments: files.to_vec(),
            response_schema: Some(response_schema()),
        };

        let raw = self.call(&request).await?;
        parse_formatted_result(&raw).inspect_err(|e| {
            log_error!("Discarding malformed response: {}", e);
            log_debug!("Raw response text: {}", raw);
        })
    }

    /// Generate a plain Markdown document without the itemized list
    pub async fn generate_text(&self, text: &str, files: &[EncodedFile]) -> Result<String> {
        ensure_input(text, files)?;

        let request = GenerationRequest {
            instruction: create_plain_instruction(text, !files.is_empty()),
            attachments: files.to_vec(),
            response_schema: None,
        };

        self.call(&request).await
    }

    /// Generate in the given mode
    pub async fn run(
        &self,
        mode: GenerationMode,
        text: &str,
        files: &[EncodedFile],
    ) -> Result<GenerationOutput> {
        match mode {
            GenerationMode::Structured => self
                .generate(text, files)
                .await
                .map(GenerationOutput::Structured),
            GenerationMode::PlainText => self
                .generate_text(text, files)
                .await
                .map(GenerationOutput::PlainText),
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String> {
        log_debug!("Instruction: {}", request.instruction);
        let span = tracing::info_span!(
            "generate_content",
            provider = self.provider.name(),
            attachments = request.attachments.len(),
            structured = request.response_schema.is_some()
        );
        match self.provider.generate(request).instrument(span).await {
            Ok(text) => {
                log_debug!("Received {} bytes from {}", text.len(), self.provider.name());
                Ok(text)
            }
            Err(e @ ReqscribeError::ResponseParse(_)) => Err(e),
            Err(e @ ReqscribeError::Communication(_)) => {
                log_error!("{} request failed: {}", self.provider.name(), e);
                Err(e)
            }
            // Anything else out of a provider is still a failed exchange with the service
            Err(other) => Err(ReqscribeError::Communication(other.to_string())),
        }
    }
}

fn ensure_input(text: &str, files: &[EncodedFile]) -> Result<()> {
    if text.trim().is_empty() && files.is_empty() {
        return Err(ReqscribeError::InvalidInput);
    }
    Ok(())
}

/// Parse and validate the model's JSON answer
pub fn parse_formatted_result(text: &str) -> Result<FormattedResult> {
    let result = match serde_json::from_str::<FormattedResult>(text) {
        Ok(result) => result,
        Err(e) => {
            log_debug!(
                "Direct JSON parse failed: {}. Attempting fallback extraction.",
                e
            );
            let cleaned = clean_json_from_llm(text);
            serde_json::from_str::<FormattedResult>(&cleaned)
                .map_err(|_| ReqscribeError::ResponseParse(e.to_string()))?
        }
    };

    result.validate().map_err(ReqscribeError::ResponseParse)?;
    Ok(result)
}

/// Strip code fences and surrounding chatter from a JSON answer
fn clean_json_from_llm(json_str: &str) -> String {
    let trimmed = json_str.trim();

    let without_codeblock = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    // Find the first '{' and last '}' to extract the JSON object
    let start = without_codeblock.find('{').unwrap_or(0);
    let end = without_codeblock
        .rfind('}')
        .map_or(without_codeblock.len(), |i| i + 1);

    if start >= end {
        return without_codeblock.trim().to_string();
    }
    without_codeblock[start..end].trim().to_string()
}
