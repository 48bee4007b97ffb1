//! 5 km time conversion.
//!
//! Times travel through the system as `HH:MM:SS` strings and are converted to
//! whole seconds right before validation. Unusable times are reported as
//! `None` so the validator can list them together with every other missing
//! field instead of failing on the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Placeholder meaning "no time could be determined".
pub const TIME_SENTINEL: &str = "00:00:00";

/// Shortest plausible 5 km time (10 minutes).
pub const MIN_TIME_SECONDS: u32 = 600;

/// Result markers copied from race tables: did not start / did not finish.
const NO_RESULT_MARKERS: [&str; 2] = ["DNS", "DNF"];

static STRICT_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("static time pattern compiles"));

static LENIENT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([0-9]{1,2}):)?([0-9]{1,2}):([0-9]{2})$")
        .expect("static time pattern compiles")
});

/// Reasons a time string cannot be converted to seconds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("'{0}' is a no-result marker")]
    NoResult(String),

    #[error("'{0}' is not in HH:MM:SS format")]
    Malformed(String),

    #[error("'{time}' is {seconds}s, below the {MIN_TIME_SECONDS}s minimum")]
    TooShort { time: String, seconds: u32 },

    /// The pattern matched but a segment did not parse as a number.
    #[error("'{0}' matched HH:MM:SS but a segment is not a decimal number")]
    Inconsistent(String),
}

/// Converts a strict `HH:MM:SS` time to seconds, explaining any rejection.
pub fn try_convert(time: &str) -> Result<u32, TimeFormatError> {
    if NO_RESULT_MARKERS.contains(&time) {
        return Err(TimeFormatError::NoResult(time.to_string()));
    }
    if !STRICT_TIME.is_match(time) {
        return Err(TimeFormatError::Malformed(time.to_string()));
    }

    let mut seconds = 0u32;
    for (segment, weight) in time.split(':').zip([3600u32, 60, 1]) {
        // `\d` is Unicode-aware, so non-ASCII digits get this far.
        let value: u32 = segment
            .parse()
            .map_err(|_| TimeFormatError::Inconsistent(time.to_string()))?;
        seconds += value * weight;
    }

    if seconds < MIN_TIME_SECONDS {
        return Err(TimeFormatError::TooShort {
            time: time.to_string(),
            seconds,
        });
    }
    Ok(seconds)
}

/// Converts a strict `HH:MM:SS` time to seconds.
///
/// Returns `None` for malformed input, no-result markers and times under ten
/// minutes.
pub fn convert(time: &str) -> Option<u32> {
    match try_convert(time) {
        Ok(seconds) => Some(seconds),
        Err(err @ TimeFormatError::Inconsistent(_)) => {
            tracing::error!(error = %err, "time passed the format check but failed to parse");
            None
        }
        Err(err) => {
            tracing::debug!(error = %err, "time rejected");
            None
        }
    }
}

/// Normalizes loosely written times (`25:00`, `1:05:30`) to `HH:MM:SS`.
///
/// Accepts `[H]H:MM:SS` and `[M]M:SS`. Seconds must be below 60, and so must
/// minutes when hours are given. Returns `None` for anything else.
pub fn normalize(text: &str) -> Option<String> {
    let caps = LENIENT_TIME.captures(text.trim())?;

    let hours: u64 = match caps.get(1) {
        Some(h) => h.as_str().parse().ok()?,
        None => 0,
    };
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;

    if seconds >= 60 || (caps.get(1).is_some() && minutes >= 60) {
        return None;
    }

    Some(format_hms(hours * 3600 + minutes * 60 + seconds))
}

/// Formats whole seconds as zero-padded `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Returns true if the string has the strict `HH:MM:SS` shape.
pub fn is_well_formed(time: &str) -> bool {
    time.len() == 8 && time.is_ascii() && STRICT_TIME.is_match(time)
}
