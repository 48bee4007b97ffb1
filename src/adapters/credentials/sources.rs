//! Individual credential sources.

use secrecy::{ExposeSecret, Secret};
use std::io::IsTerminal;

use crate::ports::{CredentialError, CredentialSource};

/// Environment variable conventionally holding the OpenAI key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Blank keys count as absent.
fn non_blank(key: Secret<String>) -> Option<Secret<String>> {
    if key.expose_secret().trim().is_empty() {
        None
    } else {
        Some(Secret::new(key.expose_secret().trim().to_string()))
    }
}

/// Key taken from application configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredKeySource {
    key: Option<Secret<String>>,
}

impl ConfiguredKeySource {
    pub fn new(key: Option<Secret<String>>) -> Self {
        Self { key }
    }
}

impl CredentialSource for ConfiguredKeySource {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn api_key(&self) -> Result<Option<Secret<String>>, CredentialError> {
        Ok(self.key.clone().and_then(non_blank))
    }
}

/// Key read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvKeySource {
    var: String,
}

impl EnvKeySource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new(OPENAI_API_KEY_VAR)
    }
}

impl CredentialSource for EnvKeySource {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn api_key(&self) -> Result<Option<Secret<String>>, CredentialError> {
        Ok(std::env::var(&self.var)
            .ok()
            .map(Secret::new)
            .and_then(non_blank))
    }
}

/// Asks the user for the key with hidden input.
///
/// Yields nothing when stdin is not a terminal.
#[derive(Debug, Clone)]
pub struct PromptKeySource {
    prompt: String,
}

impl PromptKeySource {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl CredentialSource for PromptKeySource {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn api_key(&self) -> Result<Option<Secret<String>>, CredentialError> {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }

        let key = dialoguer::Password::new()
            .with_prompt(&self.prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        Ok(non_blank(Secret::new(key)))
    }
}
