//! Half-Marathon Predictor
//!
//! Predicts a half-marathon finishing time from a free-text description of
//! a runner: a language model extracts age, gender and 5 km time, the values
//! are validated, and a regression model fetched from object storage turns
//! them into a time.

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod ports;
