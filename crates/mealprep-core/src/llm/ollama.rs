//! Ollama text-generation provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::GeneratorConfig;
use super::{GenerateError, TextGenerator};

/// Talks to a local Ollama server via its non-streaming generate endpoint.
#[derive(Debug)]
pub struct OllamaGenerator {
    model: String,
    url: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerateError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenerateError::NotConfigured(e.to_string()))?;

        Ok(Self {
            model: config.model.clone(),
            url: config.generate_url(),
            client,
        })
    }
}

/// Ollama `/api/generate` request body.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama `/api/generate` response body (non-streaming).
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Error body returned by Ollama on failure.
#[derive(Debug, Deserialize)]
struct OllamaErrorResponse {
    error: String,
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!(
            url = %self.url,
            model = %self.model,
            prompt_len = prompt.len(),
            "sending generate request"
        );

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Unavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Unavailable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OllamaErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerateError::InvalidResponse(e.to_string()))?;

        Ok(parsed.response)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn generator_for(server: &MockServer) -> OllamaGenerator {
        let config = GeneratorConfig::new(ProviderKind::Ollama, "gemma2", server.base_url());
        OllamaGenerator::new(&config).unwrap()
    }

    #[tokio::test]
    async fn returns_response_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "model": "gemma2",
                        "response": "Grains: Rice\nDairy: Milk",
                        "done": true
                    }));
            })
            .await;

        let text = generator_for(&server).generate("categorize").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Grains: Rice\nDairy: Milk");
    }

    #[tokio::test]
    async fn empty_response_is_not_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({ "response": "", "done": true }));
            })
            .await;

        let text = generator_for(&server).generate("anything").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn api_error_message_is_extracted() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(404)
                    .json_body(json!({ "error": "model \"gemma2\" not found" }));
            })
            .await;

        let err = generator_for(&server).generate("p").await.unwrap_err();
        match err {
            GenerateError::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("not found"), "unexpected message: {message}");
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("internal failure");
            })
            .await;

        let err = generator_for(&server).generate("p").await.unwrap_err();
        match err {
            GenerateError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "internal failure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn undecodable_success_body_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).body("not json");
            })
            .await;

        let err = generator_for(&server).generate("p").await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        // Port 9 (discard) is practically never served by an HTTP listener.
        let config = GeneratorConfig::new(ProviderKind::Ollama, "gemma2", "http://127.0.0.1:9");
        let err = OllamaGenerator::new(&config)
            .unwrap()
            .generate("p")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Unavailable(_)));
    }
}
