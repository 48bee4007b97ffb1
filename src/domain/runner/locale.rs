//! Language of user-facing messages.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Language used for messages shown to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pl,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pl" => Ok(Locale::Pl),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{}' (expected pl or en)", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Pl => write!(f, "pl"),
            Locale::En => write!(f, "en"),
        }
    }
}
