//! Configuration file management for mealprep.
//!
//! Provides a TOML-based config file at `~/.config/mealprep/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mealprep_core::llm::{GeneratorConfig, ProviderKind};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub generator: GeneratorSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratorSection {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout; omitted means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the mealprep config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/mealprep` or `~/.config/mealprep`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("mealprep");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("mealprep")
}

/// Return the path to the mealprep config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log file written by the interactive session.
pub fn log_path() -> PathBuf {
    config_dir().join("mealprep.log")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Load the config file if there is one; a file that exists but does not
/// parse is still an error.
fn load_optional_config() -> Result<Option<ConfigFile>> {
    if config_path().exists() {
        load_config().map(Some)
    } else {
        Ok(None)
    }
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line, each overriding everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct MealPrepConfig {
    pub generator: GeneratorConfig,
}

impl MealPrepConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Provider: `--provider` > `MEALPREP_PROVIDER` > `generator.provider` > `ollama`
    /// - Model: `--model` > `MEALPREP_MODEL` > `generator.model` > `gemma2`
    /// - Base URL: `--base-url` > `MEALPREP_BASE_URL` > `generator.base_url` >
    ///   `http://localhost:11434`
    /// - Timeout: `--timeout-secs` > `MEALPREP_TIMEOUT_SECS` > `generator.timeout_secs` > none
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file_config = load_optional_config()?;
        let file = file_config.as_ref().map(|cfg| &cfg.generator);

        let provider = if let Some(provider) = overrides.provider {
            provider
        } else if let Ok(raw) = std::env::var("MEALPREP_PROVIDER") {
            raw.parse()
                .with_context(|| format!("MEALPREP_PROVIDER env var is invalid: {raw:?}"))?
        } else if let Some(section) = file {
            section.provider
        } else {
            ProviderKind::Ollama
        };

        let model = if let Some(ref model) = overrides.model {
            model.clone()
        } else if let Ok(model) = std::env::var("MEALPREP_MODEL") {
            model
        } else if let Some(section) = file {
            section.model.clone()
        } else {
            GeneratorConfig::DEFAULT_MODEL.to_string()
        };

        let base_url = if let Some(ref url) = overrides.base_url {
            url.clone()
        } else if let Ok(url) = std::env::var("MEALPREP_BASE_URL") {
            url
        } else if let Some(section) = file {
            section.base_url.clone()
        } else {
            GeneratorConfig::DEFAULT_BASE_URL.to_string()
        };

        let timeout_secs = if overrides.timeout_secs.is_some() {
            overrides.timeout_secs
        } else if let Ok(raw) = std::env::var("MEALPREP_TIMEOUT_SECS") {
            Some(
                raw.parse::<u64>()
                    .with_context(|| format!("MEALPREP_TIMEOUT_SECS env var is invalid: {raw:?}"))?,
            )
        } else {
            file.and_then(|section| section.timeout_secs)
        };

        let mut generator = GeneratorConfig::new(provider, model, base_url);
        if let Some(secs) = timeout_secs {
            generator = generator.with_timeout(Duration::from_secs(secs));
        }

        Ok(Self { generator })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
