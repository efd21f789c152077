//! Translation provider interface

use async_trait::async_trait;

use crate::core::errors::Result;

/// A remote (or local) service that turns text in one language into another.
///
/// Implementations perform exactly one attempt per call; retry policy, if any,
/// belongs to the caller.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short human-readable name used in logs
    fn name(&self) -> &str;

    /// Translate `text` from `source_lang` to `target_lang`
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
}
