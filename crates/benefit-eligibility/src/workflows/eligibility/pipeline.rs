use super::country::CountryClassifier;
use super::domain::{Determination, EligibilityReport, FactName, RawFacts};
use super::evaluation::{
    evaluate_pension, evaluate_supplement, EvaluationConfig, PensionFacts, SupplementFacts,
    UnreachableState,
};
use super::resolver::{resolve, FactSet, InvalidFacts, Resolution};
use super::schema::FactSchema;

/// Why an evaluation produced no report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EligibilityError {
    /// The caller supplied facts that are wrong rather than merely absent.
    #[error(transparent)]
    Invalid(#[from] InvalidFacts),
    /// The rule tables failed to cover schema-valid input.
    #[error("internal rule table error: {0}")]
    Unreachable(#[from] UnreachableState),
}

/// Chains resolution and evaluation for the pension and then the supplement.
pub struct EvaluationPipeline<C> {
    pension_schema: FactSchema,
    supplement_schema: FactSchema,
    classifier: C,
    config: EvaluationConfig,
}

impl<C> EvaluationPipeline<C>
where
    C: CountryClassifier,
{
    pub fn new(classifier: C, config: EvaluationConfig) -> Self {
        Self {
            pension_schema: FactSchema::pension(),
            supplement_schema: FactSchema::supplement(),
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(&self, raw: &RawFacts) -> Result<EligibilityReport, EligibilityError> {
        let facts = FactSet::new(raw);

        let (pension, supplement) = match resolve(&self.pension_schema, facts)? {
            Resolution::Incomplete { missing } => {
                let supplement = match resolve(&self.supplement_schema, facts)? {
                    Resolution::Incomplete { missing } => Determination::needs_more_info(missing),
                    Resolution::Complete(_) => Determination::awaiting_dependency(
                        "The supplement can be determined once the pension is.",
                    ),
                };
                (Determination::needs_more_info(missing), supplement)
            }
            Resolution::Complete(validated) => {
                let pension_facts = PensionFacts::from_validated(&validated, &self.classifier)?;
                let pension = evaluate_pension(&pension_facts, &self.config)?;

                let augmented = facts.with_prior_outcome(pension.result());
                let supplement = match resolve(&self.supplement_schema, augmented)? {
                    Resolution::Incomplete { missing } => Determination::needs_more_info(missing),
                    Resolution::Complete(validated) => evaluate_supplement(
                        &SupplementFacts::from_validated(&validated),
                        &pension,
                        &self.config,
                    )?,
                };
                (pension, supplement)
            }
        };

        let all_fields = involved_fields(facts.supplied(), &pension, &supplement);
        Ok(EligibilityReport {
            pension,
            supplement,
            all_fields,
        })
    }
}

fn involved_fields(
    supplied: Vec<FactName>,
    pension: &Determination,
    supplement: &Determination,
) -> Vec<FactName> {
    let mut fields = Vec::new();
    let missing = [pension, supplement]
        .into_iter()
        .flat_map(|determination| determination.missing_fields().unwrap_or_default())
        .copied();
    for name in supplied.into_iter().chain(missing) {
        if !fields.contains(&name) {
            fields.push(name);
        }
    }
    fields
}
