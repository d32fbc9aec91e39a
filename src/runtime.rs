//! Runtime glue shared by both runners: configuration, executor plumbing, outcomes,
//! callbacks, progress tracking, and telemetry.

pub mod config;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod outcome;
pub mod progress;
pub mod telemetry;
