#![allow(dead_code)]

use reqscribe::RequirementsClient;
use reqscribe::llm_providers::{GeminiProvider, LLMProviderConfig};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Client pointed at a mock server
pub fn client_for(server: &MockServer) -> RequirementsClient {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> RequirementsClient {
    let provider = GeminiProvider::new(LLMProviderConfig {
        api_key: TEST_API_KEY.to_string(),
        model: TEST_MODEL.to_string(),
        base_url: server.uri(),
        timeout,
    });
    RequirementsClient::new(Box::new(provider))
}

/// A `generateContent` response carrying `text` as the model output
pub fn gemini_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// The structured answer for a one-line login request
pub fn login_result() -> Value {
    json!({
        "markdownOutput": "# 로그인\n\n## 사용자 요구사항\n- 사용자는 로그인할 수 있어야 한다",
        "requirementsList": [{
            "group": "사용자 요구사항",
            "id": "UR-001",
            "sequence": 1,
            "description": "로그인 기능"
        }]
    })
}

pub fn multi_group_result() -> Value {
    json!({
        "markdownOutput": "# Overview\nA note-taking app\n\n## Key Features\n- Sync\n- Search\n\n## Constraints\n- Offline first",
        "requirementsList": [
            { "group": "Key Features", "id": "KF-001", "sequence": 1, "description": "Sync notes across devices" },
            { "group": "Key Features", "id": "KF-002", "sequence": 2, "description": "Search notes, tags, and titles" },
            { "group": "Constraints", "id": "C-001", "sequence": 1, "description": "Work \"offline first\"" }
        ]
    })
}
