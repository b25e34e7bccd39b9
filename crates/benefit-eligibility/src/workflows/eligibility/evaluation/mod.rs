mod config;
mod pension;
mod supplement;

pub use config::EvaluationConfig;
pub use pension::{evaluate_pension, PensionFacts};
pub use supplement::{evaluate_supplement, SupplementFacts};

use super::domain::{FactName, ResultKind};

/// A branch that schema-valid input can never reach. Indicates a bug in the rule tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnreachableState {
    #[error("pension rule table has no case for {facts}")]
    PensionFallthrough { facts: String },
    #[error("{stage} evaluation reached without validated fact `{field}`")]
    MissingValidatedFact {
        stage: &'static str,
        field: FactName,
    },
    #[error("supplement evaluation reached with unresolved pension outcome {pension:?}")]
    UnresolvedPension { pension: ResultKind },
    #[error("supplement evaluation reached with inconsistent facts: {detail}")]
    InconsistentFacts { detail: String },
}
