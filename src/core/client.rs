//! HTTP client for the Google web translation interface

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::provider::TranslationProvider;

/// Provider backed by the unauthenticated `translate_a/single` endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    config: Arc<TranslatorConfig>,
}

impl GoogleTranslator {
    /// Create a new translator client
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| TranslationError::ConfigError { message: e.to_string() })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Send actual HTTP request
    async fn send_request(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.config.api_endpoint)
            .header("Accept", "application/json,text/html;q=0.9,*/*;q=0.8")
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::ProviderError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Provider returned HTTP {}", status_code);
            return Err(TranslationError::ProviderError {
                status: Some(status_code),
                message: format!("HTTP {}: {}", status_code, preview(&error_text)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::ProviderError {
                status: Some(status.as_u16()),
                message: e.to_string(),
            })?;

        parse_response(&body)
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        debug!(
            "Requesting {} chars {} -> {} from {}",
            text.chars().count(),
            source_lang,
            target_lang,
            self.config.api_endpoint
        );
        self.send_request(text, source_lang, target_lang).await
    }
}

/// Decode a `translate_a/single` body.
///
/// The body is a nested JSON array whose first element lists the translated
/// sentences; the first string of every entry is concatenated.
pub fn parse_response(body: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TranslationError::ParseError {
            message: format!("{} (body: {})", e, preview(body)),
        })?;

    let sentences = json
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslationError::ParseError {
            message: format!("No sentence list in response: {}", preview(body)),
        })?;

    let translation: String = sentences
        .iter()
        .filter_map(|entry| entry.get(0).and_then(|t| t.as_str()))
        .collect();

    Ok(translation)
}

fn preview(body: &str) -> String {
    const LIMIT: usize = 200;
    if body.chars().count() > LIMIT {
        format!("{}...", body.chars().take(LIMIT).collect::<String>())
    } else {
        body.to_string()
    }
}
