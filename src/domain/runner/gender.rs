//! Gender codes used by the regression model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender as encoded in the race results the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Code `K` (kobieta).
    #[serde(rename = "K")]
    Female,
    /// Code `M` (mężczyzna).
    #[serde(rename = "M")]
    Male,
}

impl Gender {
    /// Single-letter code used in the model's feature row.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Female => "K",
            Gender::Male => "M",
        }
    }

    /// Maps free-form model output to a gender code.
    ///
    /// Accepts the codes themselves plus common Polish and English words.
    /// Returns `None` when the text names neither.
    pub fn from_loose(text: &str) -> Option<Self> {
        let lowered = text.trim().to_lowercase();
        match lowered.as_str() {
            "k" | "f" | "w" | "kobieta" | "female" | "woman" | "żeńska" => Some(Gender::Female),
            "m" | "mężczyzna" | "mezczyzna" | "male" | "man" | "męska" => Some(Gender::Male),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
