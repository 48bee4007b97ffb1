//! User surface configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::runner::Locale;

/// Presentation settings for the interactive surface
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Language of user-facing messages
    #[serde(default)]
    pub locale: Locale,

    /// Log filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reveal the result character by character
    #[serde(default = "default_animate")]
    pub animate: bool,

    /// Delay between title characters
    #[serde(default = "default_title_delay")]
    pub title_delay_ms: u64,

    /// Delay between result characters
    #[serde(default = "default_result_delay")]
    pub result_delay_ms: u64,

    /// Pause between title and result
    #[serde(default = "default_pause")]
    pub pause_ms: u64,
}

impl AppSection {
    pub fn title_delay(&self) -> Duration {
        Duration::from_millis(self.title_delay_ms)
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Validate app configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            log_level: default_log_level(),
            animate: default_animate(),
            title_delay_ms: default_title_delay(),
            result_delay_ms: default_result_delay(),
            pause_ms: default_pause(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_animate() -> bool {
    true
}

fn default_title_delay() -> u64 {
    100
}

fn default_result_delay() -> u64 {
    200
}

fn default_pause() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_defaults() {
        let config = AppSection::default();
        assert_eq!(config.locale, Locale::Pl);
        assert_eq!(config.log_level, "warn");
        assert!(config.animate);
        assert_eq!(config.title_delay(), Duration::from_millis(100));
        assert_eq!(config.result_delay(), Duration::from_millis(200));
        assert_eq!(config.pause(), Duration::from_secs(1));
    }

    #[test]
    fn test_validation_rejects_blank_log_level() {
        let config = AppSection {
            log_level: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
