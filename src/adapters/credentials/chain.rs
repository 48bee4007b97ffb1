//! Ordered credential lookup.

use secrecy::Secret;

use super::sources::{ConfiguredKeySource, EnvKeySource, PromptKeySource};
use crate::ports::{CredentialError, CredentialSource};

/// Tries each source in turn; the first key found wins.
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Configured key, then `OPENAI_API_KEY`, then the interactive prompt.
    pub fn standard(configured: Option<Secret<String>>, prompt: impl Into<String>) -> Self {
        Self::new(vec![
            Box::new(ConfiguredKeySource::new(configured)),
            Box::new(EnvKeySource::default()),
            Box::new(PromptKeySource::new(prompt)),
        ])
    }

    /// Resolves the key or halts with `CredentialError::Unavailable`.
    pub fn resolve(&self) -> Result<Secret<String>, CredentialError> {
        let mut tried = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            tried.push(source.name());
            if let Some(key) = source.api_key()? {
                tracing::debug!(source = source.name(), "API key resolved");
                return Ok(key);
            }
        }

        tracing::warn!(tried = ?tried, "no API key available");
        Err(CredentialError::Unavailable { tried })
    }
}
