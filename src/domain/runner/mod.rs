//! Runner profile: extraction contract, time conversion, validation and
//! prediction shapes.

mod gender;
mod locale;
mod prediction;
mod record;
pub mod schema;
pub mod time;
mod validation;

pub use gender::Gender;
pub use locale::Locale;
pub use prediction::{format_duration, PredictionError, PredictionInput, PredictionOutcome};
pub use record::{ConvertedRecord, UserRecord, ValidatedRecord, MAX_AGE, MIN_AGE};
pub use schema::{ExtractionSchema, FieldIssue, SchemaValidationError};
pub use time::{TimeFormatError, MIN_TIME_SECONDS, TIME_SENTINEL};
pub use validation::{into_validated, validate, MissingField, ValidationAggregateError};
