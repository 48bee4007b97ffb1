//! Domain layer - pure logic with no I/O.
//!
//! - `foundation` - shared error types
//! - `runner` - runner profile records, time conversion, the extraction
//!   contract, validation and result formatting

pub mod foundation;
pub mod runner;
