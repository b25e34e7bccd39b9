//! Two-stage eligibility evaluation: the pension first, then the income supplement that
//! depends on it.
//!
//! Facts are resolved against a declarative [`schema::FactSchema`] per stage. The resolver
//! either hands back typed facts, lists the fields still required, or rejects the request.
//! Only fully resolved facts reach the evaluators.

pub mod country;
pub mod domain;
pub mod evaluation;
pub mod pipeline;
pub mod resolver;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use country::{AgreementRegistry, CountryClassifier};
pub use domain::{
    CountryCategory, Determination, EligibilityReport, FactName, LegalStatus, MaritalStatus,
    RawFacts, ReasonCode, ResultKind,
};
pub use evaluation::{EvaluationConfig, UnreachableState};
pub use pipeline::{EligibilityError, EvaluationPipeline};
pub use resolver::{resolve, FactSet, InvalidFacts, Resolution, Violation, ViolationKind};
pub use router::eligibility_router;
pub use schema::FactSchema;
pub use service::EligibilityService;

/// Client-facing message for rejected requests.
pub const INVALID_REQUEST_MESSAGE: &str = "Request is invalid!";
