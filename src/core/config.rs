//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default public endpoint of the Google web translation interface
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Browser user agent sent with every provider request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Prefix of the environment variables read by [`TranslatorConfig::load`]
pub const ENV_PREFIX: &str = "TRANSLATOR";

/// Configuration for translator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub api_endpoint: String,
    pub user_agent: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout_ms: u64,
    /// Pause between two chunk requests of the same unit
    pub chunk_delay_ms: u64,
    /// Pause between two units of a batch
    pub unit_delay_ms: u64,
    /// Appended to the file stem of batch outputs; empty keeps the input name
    pub output_suffix: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            source_lang: "en".to_string(),
            target_lang: "pt".to_string(),
            timeout_ms: 30000,
            chunk_delay_ms: 500,
            unit_delay_ms: 1000,
            output_suffix: "_translated".to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Load configuration: defaults, then an optional file, then `TRANSLATOR_*` env vars
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        debug!("Effective configuration: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.source_lang.trim().is_empty() {
            return Err(anyhow::anyhow!("source_lang must not be empty"));
        }

        if self.target_lang.trim().is_empty() {
            return Err(anyhow::anyhow!("target_lang must not be empty"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    pub fn unit_delay(&self) -> Duration {
        Duration::from_millis(self.unit_delay_ms)
    }
}
