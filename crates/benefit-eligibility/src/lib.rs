//! Pension and income supplement eligibility evaluation.
//!
//! The [`workflows::eligibility`] module holds the fact schema, requirement resolver,
//! both benefit evaluators, and the pipeline that chains them. Configuration, telemetry,
//! and the application error type support the HTTP service in `services/api`.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
