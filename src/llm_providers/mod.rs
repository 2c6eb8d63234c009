//! Backends that talk to the generation service

mod gemini;

pub use gemini::GeminiProvider;

use crate::encoder::EncodedFile;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Everything a backend needs for one generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Primary text segment sent before any attachment
    pub instruction: String,
    /// Inline-data segments, one per attached file, in order
    pub attachments: Vec<EncodedFile>,
    /// When set, the service must answer with JSON matching this schema
    pub response_schema: Option<Value>,
}

/// A generation service backend
///
/// Implementations make exactly one call per `generate` and return the raw
/// text the model produced. Transport problems map to
/// [`ReqscribeError::Communication`](crate::error::ReqscribeError::Communication).
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Display name for logs and status output
    fn name(&self) -> &'static str;
}

/// Connection settings for a provider
#[derive(Debug, Clone)]
pub struct LLMProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}
