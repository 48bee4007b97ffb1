//! The extraction contract handed to the language model.
//!
//! The model is asked for a JSON object with `age`, `gender` and `time_5km`.
//! Its raw output is coerced into a [`UserRecord`] in a single pass that
//! collects every offending field instead of stopping at the first.

use serde_json::{json, Value};
use thiserror::Error;

use super::gender::Gender;
use super::record::{UserRecord, MAX_AGE, MIN_AGE};
use super::time::{self, TIME_SENTINEL};

pub const FIELD_AGE: &str = "age";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_TIME_5KM: &str = "time_5km";

/// Name under which the schema is registered with the model provider.
pub const SCHEMA_NAME: &str = "runner_profile";

/// A single field of the model output that did not fit the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub reason: String,
}

/// The model output could not be coerced into the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model output does not match the extraction schema (fields: {})", join_fields(.issues))]
pub struct SchemaValidationError {
    issues: Vec<FieldIssue>,
}

impl SchemaValidationError {
    /// Creates an error reporting every contract field with the same reason.
    pub fn all_fields(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            issues: [FIELD_AGE, FIELD_GENDER, FIELD_TIME_5KM]
                .into_iter()
                .map(|field| FieldIssue {
                    field,
                    reason: reason.clone(),
                })
                .collect(),
        }
    }

    /// Names of the offending fields, in contract order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.field).collect()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }
}

fn join_fields(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.field)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Typed description of the runner profile the model must return.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionSchema;

impl ExtractionSchema {
    /// JSON Schema used as the model's structured-output contract.
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                FIELD_AGE: {
                    "type": ["integer", "null"],
                    "minimum": MIN_AGE,
                    "maximum": MAX_AGE,
                    "description": "Age in years, or null if it cannot be determined."
                },
                FIELD_GENDER: {
                    "type": ["string", "null"],
                    "description": "K for a woman, M for a man, or null if it cannot be determined."
                },
                FIELD_TIME_5KM: {
                    "type": "string",
                    "description": "5 km time as HH:MM:SS, or 00:00:00 if it cannot be determined."
                }
            },
            "required": [FIELD_AGE, FIELD_GENDER, FIELD_TIME_5KM],
            "additionalProperties": false
        })
    }

    /// Coerces raw model output into a record.
    ///
    /// Absent or empty values fall back to their defaults (`None` for age
    /// and gender, the sentinel for the time). Values of the wrong type or
    /// outside the allowed range are reported together.
    pub fn coerce(raw: &Value) -> Result<UserRecord, SchemaValidationError> {
        let object = raw
            .as_object()
            .ok_or_else(|| SchemaValidationError::all_fields("expected a JSON object"))?;

        let mut issues = Vec::new();

        let age = match coerce_age(object.get(FIELD_AGE)) {
            Ok(age) => age,
            Err(reason) => {
                issues.push(FieldIssue {
                    field: FIELD_AGE,
                    reason,
                });
                None
            }
        };

        let gender = match coerce_gender(object.get(FIELD_GENDER)) {
            Ok(gender) => gender,
            Err(reason) => {
                issues.push(FieldIssue {
                    field: FIELD_GENDER,
                    reason,
                });
                None
            }
        };

        let time_5km = match coerce_time(object.get(FIELD_TIME_5KM)) {
            Ok(time) => time,
            Err(reason) => {
                issues.push(FieldIssue {
                    field: FIELD_TIME_5KM,
                    reason,
                });
                TIME_SENTINEL.to_string()
            }
        };

        if !issues.is_empty() {
            return Err(SchemaValidationError { issues });
        }

        UserRecord::new(age, gender, time_5km).map_err(|e| SchemaValidationError {
            issues: vec![FieldIssue {
                field: match e.field() {
                    FIELD_AGE => FIELD_AGE,
                    FIELD_GENDER => FIELD_GENDER,
                    _ => FIELD_TIME_5KM,
                },
                reason: e.to_string(),
            }],
        })
    }
}

fn coerce_age(value: Option<&Value>) -> Result<Option<u8>, String> {
    let number = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() || s.trim() == "None" => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not a number", s))?,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| format!("{} is not representable", n))?,
        Some(other) => return Err(format!("expected an integer, got {}", other)),
    };

    if number.fract() != 0.0 {
        return Err(format!("{} is not a whole number", number));
    }
    if number < f64::from(MIN_AGE) || number > f64::from(MAX_AGE) {
        return Err(format!(
            "{} is outside the {}-{} range",
            number, MIN_AGE, MAX_AGE
        ));
    }
    Ok(Some(number as u8))
}

fn coerce_gender(value: Option<&Value>) -> Result<Option<Gender>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Gender::from_loose(s)),
        Some(other) => Err(format!("expected a string, got {}", other)),
    }
}

fn coerce_time(value: Option<&Value>) -> Result<String, String> {
    match value {
        None | Some(Value::Null) => Ok(TIME_SENTINEL.to_string()),
        Some(Value::String(s)) => {
            Ok(time::normalize(s).unwrap_or_else(|| TIME_SENTINEL.to_string()))
        }
        Some(other) => Err(format!("expected a string, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_complete_output() {
        let raw = json!({"age": 30, "gender": "M", "time_5km": "00:25:00"});
        let record = ExtractionSchema::coerce(&raw).unwrap();
        assert_eq!(record.age(), Some(30));
        assert_eq!(record.gender(), Some(Gender::Male));
        assert_eq!(record.time_5km(), "00:25:00");
    }

    #[test]
    fn absent_fields_take_defaults() {
        let record = ExtractionSchema::coerce(&json!({})).unwrap();
        assert_eq!(record, UserRecord::unresolved());
    }

    #[test]
    fn empty_age_becomes_none() {
        let raw = json!({"age": "", "gender": "K", "time_5km": "00:30:00"});
        let record = ExtractionSchema::coerce(&raw).unwrap();
        assert_eq!(record.age(), None);
        assert_eq!(record.gender(), Some(Gender::Female));
    }

    #[test]
    fn numeric_string_and_integral_float_ages_are_accepted() {
        let from_string = ExtractionSchema::coerce(&json!({"age": "42"})).unwrap();
        assert_eq!(from_string.age(), Some(42));

        let from_float = ExtractionSchema::coerce(&json!({"age": 42.0})).unwrap();
        assert_eq!(from_float.age(), Some(42));
    }

    #[test]
    fn out_of_range_age_is_offending() {
        let err = ExtractionSchema::coerce(&json!({"age": 7})).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_AGE]);

        let err = ExtractionSchema::coerce(&json!({"age": 120})).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_AGE]);
    }

    #[test]
    fn fractional_age_is_offending() {
        let err = ExtractionSchema::coerce(&json!({"age": 30.5})).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_AGE]);
    }

    #[test]
    fn unrecognized_gender_is_unresolved() {
        let record = ExtractionSchema::coerce(&json!({"gender": "nie wiem"})).unwrap();
        assert_eq!(record.gender(), None);
    }

    #[test]
    fn loose_time_is_normalized() {
        let record = ExtractionSchema::coerce(&json!({"time_5km": "25:00"})).unwrap();
        assert_eq!(record.time_5km(), "00:25:00");
    }

    #[test]
    fn unparseable_time_falls_back_to_sentinel() {
        let record = ExtractionSchema::coerce(&json!({"time_5km": "szybko"})).unwrap();
        assert!(record.has_sentinel_time());
    }

    #[test]
    fn all_offending_fields_are_collected() {
        let raw = json!({"age": "trzydzieści", "gender": 1, "time_5km": 1500});
        let err = ExtractionSchema::coerce(&raw).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_AGE, FIELD_GENDER, FIELD_TIME_5KM]);
        assert_eq!(err.issues().len(), 3);
    }

    #[test]
    fn non_object_output_fails_every_field() {
        let err = ExtractionSchema::coerce(&json!(["age", 30])).unwrap_err();
        assert_eq!(err.fields(), vec![FIELD_AGE, FIELD_GENDER, FIELD_TIME_5KM]);
    }

    #[test]
    fn error_message_names_fields() {
        let err = ExtractionSchema::coerce(&json!({"age": true})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "model output does not match the extraction schema (fields: age)"
        );
    }

    #[test]
    fn json_schema_requires_every_field() {
        let schema = ExtractionSchema::json_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["age", "gender", "time_5km"]);
        assert_eq!(schema["properties"]["age"]["minimum"], 10);
        assert_eq!(schema["properties"]["age"]["maximum"], 99);
    }
}
