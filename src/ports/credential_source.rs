//! Credential Source Port - Where the language model API key comes from.
//!
//! Sources are tried in order by the credential chain; the first one that
//! yields a non-empty key wins.

use secrecy::Secret;

/// A place an API key may be found.
pub trait CredentialSource: Send + Sync {
    /// Name for logs (never the key itself).
    fn name(&self) -> &'static str;

    /// Looks up the key.
    ///
    /// `Ok(None)` means this source has no key and the next should be
    /// tried; `Err` means the source itself failed.
    fn api_key(&self) -> Result<Option<Secret<String>>, CredentialError>;
}

/// Errors from credential lookup.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No source produced a key; the application cannot continue.
    #[error("no API key available (tried: {})", .tried.join(", "))]
    Unavailable { tried: Vec<&'static str> },

    #[error("credential prompt failed: {0}")]
    Prompt(String),
}
