use std::sync::Arc;

use serde_json::{json, Value};

use crate::workflows::eligibility::{
    AgreementRegistry, EligibilityService, EvaluationConfig, EvaluationPipeline, RawFacts,
};

pub(super) fn facts(value: Value) -> RawFacts {
    serde_json::from_value(value).expect("fact object")
}

pub(super) fn pension_eligible_facts() -> Value {
    json!({
        "age": 65,
        "country": "home",
        "legalStatus": "citizen",
        "yearsResident": 10,
    })
}

/// Merge `extra` into `base`, both JSON objects.
pub(super) fn with(base: Value, extra: Value) -> RawFacts {
    let mut merged = facts(base);
    merged.extend(facts(extra));
    merged
}

pub(super) fn pipeline() -> EvaluationPipeline<AgreementRegistry> {
    EvaluationPipeline::new(AgreementRegistry::default(), EvaluationConfig::default())
}

pub(super) fn service() -> Arc<EligibilityService<AgreementRegistry>> {
    Arc::new(EligibilityService::new(
        AgreementRegistry::default(),
        EvaluationConfig::default(),
    ))
}
