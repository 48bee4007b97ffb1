//! Credential Adapters
//!
//! Sources for the OpenAI API key and the chain that tries them in order:
//! configured key, `OPENAI_API_KEY`, then an interactive hidden prompt.

mod chain;
mod sources;

pub use chain::CredentialChain;
pub use sources::{ConfiguredKeySource, EnvKeySource, PromptKeySource, OPENAI_API_KEY_VAR};
