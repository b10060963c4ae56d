//! Text-generation client boundary.
//!
//! The pipeline only needs one operation: send a prompt, get a completion
//! back. [`TextGenerator`] captures that; [`OllamaGenerator`] talks to a
//! locally hosted model and [`FakeGenerator`] serves canned completions for
//! tests and offline demos.
//!
//! ```text
//! Pipeline --generate(prompt)--> Arc<dyn TextGenerator>
//!                                   |
//!                  +----------------+----------------+
//!                  |                                 |
//!           OllamaGenerator                    FakeGenerator
//!       POST {base_url}/api/generate        substring -> canned text
//! ```

pub mod config;
pub mod fake;
pub mod ollama;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{GeneratorConfig, ProviderKind};
pub use fake::FakeGenerator;
pub use ollama::OllamaGenerator;

/// Errors surfaced by a text generator.
///
/// Malformed completions are not errors here; they come back as text and
/// fail later, line by line, in the parser.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),

    #[error("generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response from generation service: {0}")]
    InvalidResponse(String),

    #[error("no completion configured for prompt: {0}")]
    NoCompletion(String),

    #[error("generator not configured: {0}")]
    NotConfigured(String),
}

/// A text-completion provider.
///
/// Completions carry no format guarantee: callers must be ready for
/// well-formed text, malformed text, or an empty string.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Complete a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    /// Provider name (e.g. "ollama", "fake").
    fn provider_name(&self) -> &'static str;

    /// Model the provider was configured with.
    fn model_name(&self) -> &str;
}

// Compile-time assertion: TextGenerator must be usable as `dyn TextGenerator`.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};

/// Build the generator selected by `config`.
pub fn create_generator(config: &GeneratorConfig) -> Result<Arc<dyn TextGenerator>, GenerateError> {
    match config.provider {
        ProviderKind::Ollama => Ok(Arc::new(OllamaGenerator::new(config)?)),
        ProviderKind::Fake => Ok(Arc::new(FakeGenerator::with_sample_responses())),
    }
}
