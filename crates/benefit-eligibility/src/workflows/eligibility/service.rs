use tracing::{debug, error, info};

use super::country::CountryClassifier;
use super::domain::{EligibilityReport, RawFacts};
use super::evaluation::EvaluationConfig;
use super::pipeline::{EligibilityError, EvaluationPipeline};

/// Facade over the pipeline that records each evaluation.
pub struct EligibilityService<C> {
    pipeline: EvaluationPipeline<C>,
}

impl<C> EligibilityService<C>
where
    C: CountryClassifier,
{
    pub fn new(classifier: C, config: EvaluationConfig) -> Self {
        Self {
            pipeline: EvaluationPipeline::new(classifier, config),
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        self.pipeline.config()
    }

    pub fn evaluate(&self, raw: &RawFacts) -> Result<EligibilityReport, EligibilityError> {
        debug!(facts = raw.len(), "evaluating eligibility");

        match self.pipeline.evaluate(raw) {
            Ok(report) => {
                debug!(
                    pension = ?report.pension.result(),
                    supplement = ?report.supplement.result(),
                    fields = report.all_fields.len(),
                    "eligibility evaluated"
                );
                Ok(report)
            }
            Err(EligibilityError::Invalid(invalid)) => {
                info!(violations = invalid.violations.len(), %invalid, "rejected invalid facts");
                Err(EligibilityError::Invalid(invalid))
            }
            Err(EligibilityError::Unreachable(state)) => {
                error!(%state, "eligibility rule tables reached an unreachable state");
                Err(EligibilityError::Unreachable(state))
            }
        }
    }
}
