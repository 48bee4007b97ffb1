//! Foundation types shared across the domain.

mod errors;

pub use errors::ValidationError;
