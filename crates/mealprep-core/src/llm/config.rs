use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which [`super::TextGenerator`] implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Ollama,
    Fake,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ollama => "ollama",
            Self::Fake => "fake",
        };
        f.write_str(s)
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ollama" => Ok(Self::Ollama),
            "fake" => Ok(Self::Fake),
            other => Err(ProviderKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ProviderKind`] string.
#[derive(Debug, Clone)]
pub struct ProviderKindParseError(pub String);

impl fmt::Display for ProviderKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid provider: {:?} (expected ollama or fake)", self.0)
    }
}

impl std::error::Error for ProviderKindParseError {}

/// Generation client configuration.
///
/// Reads `MEALPREP_PROVIDER`, `MEALPREP_MODEL`, `MEALPREP_BASE_URL` and
/// `MEALPREP_TIMEOUT_SECS`, falling back to a local Ollama serving `gemma2`
/// with no request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    pub model: String,
    /// Root URL of the generation service (no trailing path).
    pub base_url: String,
    /// Per-request timeout; `None` waits for as long as the model takes.
    pub timeout: Option<Duration>,
}

impl GeneratorConfig {
    pub const DEFAULT_MODEL: &str = "gemma2";
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

    /// Build a config from the environment, ignoring unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env::var("MEALPREP_PROVIDER")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.provider),
            model: env::var("MEALPREP_MODEL").unwrap_or(defaults.model),
            base_url: env::var("MEALPREP_BASE_URL").unwrap_or(defaults.base_url),
            timeout: env::var("MEALPREP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
        }
    }

    /// Build a config from explicit values (useful for tests and CLI flags).
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the Ollama generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(ProviderKind::Ollama, Self::DEFAULT_MODEL, Self::DEFAULT_BASE_URL)
    }
}
