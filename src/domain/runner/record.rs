//! Runner records at each stage of a request.
//!
//! `UserRecord` is what extraction produces, `ConvertedRecord` carries the
//! time in seconds, and `ValidatedRecord` only exists once every field is
//! present.

use serde::Serialize;

use super::gender::Gender;
use super::time::{self, TIME_SENTINEL};
use crate::domain::foundation::ValidationError;

/// Youngest age the model accepts.
pub const MIN_AGE: u8 = 10;

/// Oldest age the model accepts.
pub const MAX_AGE: u8 = 99;

/// Structured runner data extracted from free text.
///
/// Invariants hold by construction: `age` is `None` or within
/// [`MIN_AGE`, `MAX_AGE`], and `time_5km` is always `HH:MM:SS`
/// (possibly the sentinel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    age: Option<u8>,
    gender: Option<Gender>,
    time_5km: String,
}

impl UserRecord {
    /// Builds a record, rejecting values outside the domain.
    pub fn new(
        age: Option<u8>,
        gender: Option<Gender>,
        time_5km: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(age) = age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(ValidationError::out_of_range(
                    "age",
                    i64::from(MIN_AGE),
                    i64::from(MAX_AGE),
                    i64::from(age),
                ));
            }
        }

        let time_5km = time_5km.into();
        if !time::is_well_formed(&time_5km) {
            return Err(ValidationError::invalid_format(
                "time_5km",
                format!("expected HH:MM:SS, got '{}'", time_5km),
            ));
        }

        Ok(Self {
            age,
            gender,
            time_5km,
        })
    }

    /// A record where nothing could be determined.
    pub fn unresolved() -> Self {
        Self {
            age: None,
            gender: None,
            time_5km: TIME_SENTINEL.to_string(),
        }
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn time_5km(&self) -> &str {
        &self.time_5km
    }

    /// True when the time is the "could not determine" placeholder.
    pub fn has_sentinel_time(&self) -> bool {
        self.time_5km == TIME_SENTINEL
    }

    /// Converts the time to seconds for validation.
    pub fn convert(&self) -> ConvertedRecord {
        ConvertedRecord {
            age: self.age,
            gender: self.gender,
            time_5km_seconds: time::convert(&self.time_5km),
        }
    }
}

/// A record with the time converted to seconds.
///
/// `time_5km_seconds` is `None` when the time was missing, malformed or
/// implausibly short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConvertedRecord {
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub time_5km_seconds: Option<u32>,
}

/// A record with every field present and within its domain.
///
/// Built by [`super::validation::into_validated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidatedRecord {
    pub age: u8,
    pub gender: Gender,
    pub time_5km_seconds: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_values_in_domain() {
        let record = UserRecord::new(Some(30), Some(Gender::Male), "00:25:00").unwrap();
        assert_eq!(record.age(), Some(30));
        assert_eq!(record.gender(), Some(Gender::Male));
        assert_eq!(record.time_5km(), "00:25:00");
        assert!(!record.has_sentinel_time());
    }

    #[test]
    fn new_accepts_age_bounds() {
        assert!(UserRecord::new(Some(MIN_AGE), None, TIME_SENTINEL).is_ok());
        assert!(UserRecord::new(Some(MAX_AGE), None, TIME_SENTINEL).is_ok());
    }

    #[test]
    fn new_rejects_age_out_of_domain() {
        let err = UserRecord::new(Some(9), None, TIME_SENTINEL).unwrap_err();
        assert_eq!(err.field(), "age");
        assert!(UserRecord::new(Some(100), None, TIME_SENTINEL).is_err());
    }

    #[test]
    fn new_rejects_malformed_time() {
        let err = UserRecord::new(None, None, "25:00").unwrap_err();
        assert_eq!(err.field(), "time_5km");
    }

    #[test]
    fn unresolved_uses_sentinel() {
        let record = UserRecord::unresolved();
        assert_eq!(record.age(), None);
        assert_eq!(record.gender(), None);
        assert!(record.has_sentinel_time());
    }

    #[test]
    fn convert_keeps_fields_and_converts_time() {
        let record = UserRecord::new(Some(30), Some(Gender::Male), "00:25:00").unwrap();
        let converted = record.convert();
        assert_eq!(converted.age, Some(30));
        assert_eq!(converted.gender, Some(Gender::Male));
        assert_eq!(converted.time_5km_seconds, Some(1500));
    }

    #[test]
    fn convert_maps_sentinel_to_none() {
        assert_eq!(UserRecord::unresolved().convert().time_5km_seconds, None);
    }
}
