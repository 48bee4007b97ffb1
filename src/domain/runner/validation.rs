//! Completeness checks before prediction.
//!
//! Every field is checked independently so a single message can name all
//! missing data at once.

use serde::Serialize;
use std::error::Error;
use std::fmt;

use super::locale::Locale;
use super::record::{ConvertedRecord, ValidatedRecord};

/// A field that is missing or outside its domain after conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Age,
    Gender,
    #[serde(rename = "time_5km")]
    Time5km,
}

impl MissingField {
    /// Name of the field in the extraction contract.
    pub fn field_name(&self) -> &'static str {
        match self {
            MissingField::Age => "age",
            MissingField::Gender => "gender",
            MissingField::Time5km => "time_5km",
        }
    }

    /// Human-readable description naming the field and its accepted values.
    pub fn describe(&self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, MissingField::Age) => "missing age (10–99)",
            (Locale::En, MissingField::Gender) => "missing gender (K or M)",
            (Locale::En, MissingField::Time5km) => {
                "missing 5 km time (HH:MM:SS, at least 00:10:00)"
            }
            (Locale::Pl, MissingField::Age) => "wieku (przedział 10-99 lat)",
            (Locale::Pl, MissingField::Gender) => "płci (K lub M)",
            (Locale::Pl, MissingField::Time5km) => {
                "czasu na 5 km (format HH:MM:SS, minimum 10 minut)"
            }
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe(Locale::En))
    }
}

/// One or more fields could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationAggregateError {
    missing: Vec<MissingField>,
}

impl ValidationAggregateError {
    pub fn missing(&self) -> &[MissingField] {
        &self.missing
    }

    /// Single combined message listing every missing field.
    pub fn message(&self, locale: Locale) -> String {
        let parts: Vec<&str> = self.missing.iter().map(|m| m.describe(locale)).collect();
        match locale {
            Locale::En => format!("Incomplete data: {}.", parts.join("; ")),
            Locale::Pl => format!(
                "Brakuje danych dla: {}. Proszę uzupełnij dane.",
                parts.join(", ")
            ),
        }
    }
}

impl fmt::Display for ValidationAggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Locale::En))
    }
}

impl Error for ValidationAggregateError {}

/// Lists every missing field; an empty list means prediction can proceed.
pub fn validate(record: &ConvertedRecord) -> Vec<MissingField> {
    let mut missing = Vec::new();
    if record.age.is_none() {
        missing.push(MissingField::Age);
    }
    if record.gender.is_none() {
        missing.push(MissingField::Gender);
    }
    if record.time_5km_seconds.is_none() {
        missing.push(MissingField::Time5km);
    }
    missing
}

/// Validates and, when complete, unwraps the optional fields.
pub fn into_validated(
    record: ConvertedRecord,
) -> Result<ValidatedRecord, ValidationAggregateError> {
    match (record.age, record.gender, record.time_5km_seconds) {
        (Some(age), Some(gender), Some(time_5km_seconds)) => Ok(ValidatedRecord {
            age,
            gender,
            time_5km_seconds,
        }),
        _ => Err(ValidationAggregateError {
            missing: validate(&record),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runner::Gender;

    fn complete() -> ConvertedRecord {
        ConvertedRecord {
            age: Some(30),
            gender: Some(Gender::Male),
            time_5km_seconds: Some(1500),
        }
    }

    #[test]
    fn complete_record_has_nothing_missing() {
        assert!(validate(&complete()).is_empty());
    }

    #[test]
    fn missing_age_is_reported_alone() {
        let record = ConvertedRecord {
            age: None,
            ..complete()
        };
        let missing = validate(&record);
        assert_eq!(missing, vec![MissingField::Age]);
        assert_eq!(missing[0].to_string(), "missing age (10–99)");
    }

    #[test]
    fn every_missing_field_is_reported_in_order() {
        let record = ConvertedRecord {
            age: None,
            gender: None,
            time_5km_seconds: None,
        };
        assert_eq!(
            validate(&record),
            vec![MissingField::Age, MissingField::Gender, MissingField::Time5km]
        );
    }

    #[test]
    fn into_validated_unwraps_complete_record() {
        let validated = into_validated(complete()).unwrap();
        assert_eq!(validated.age, 30);
        assert_eq!(validated.gender, Gender::Male);
        assert_eq!(validated.time_5km_seconds, 1500);
    }

    #[test]
    fn into_validated_aggregates_missing_fields() {
        let record = ConvertedRecord {
            gender: None,
            time_5km_seconds: None,
            ..complete()
        };
        let err = into_validated(record).unwrap_err();
        assert_eq!(err.missing(), &[MissingField::Gender, MissingField::Time5km]);
    }

    #[test]
    fn aggregate_message_is_localized() {
        let record = ConvertedRecord {
            age: None,
            gender: None,
            ..complete()
        };
        let err = into_validated(record).unwrap_err();
        assert_eq!(
            err.message(Locale::Pl),
            "Brakuje danych dla: wieku (przedział 10-99 lat), płci (K lub M). Proszę uzupełnij dane."
        );
        assert_eq!(
            err.to_string(),
            "Incomplete data: missing age (10–99); missing gender (K or M)."
        );
    }

    #[test]
    fn field_names_match_contract() {
        assert_eq!(MissingField::Age.field_name(), "age");
        assert_eq!(MissingField::Gender.field_name(), "gender");
        assert_eq!(MissingField::Time5km.field_name(), "time_5km");
    }
}
