use super::super::domain::{Determination, FactName, MaritalStatus, ReasonCode, ResultKind};
use super::super::resolver::ValidatedFacts;
use super::config::EvaluationConfig;
use super::UnreachableState;

/// Supplement inputs. Presence is guaranteed by the resolver only while the pension is not
/// ineligible, so every field stays optional here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupplementFacts {
    pub age: Option<u32>,
    pub marital_status: Option<MaritalStatus>,
    pub partner_receives_other: Option<bool>,
    pub income: Option<u64>,
}

impl SupplementFacts {
    pub fn from_validated(facts: &ValidatedFacts) -> Self {
        Self {
            age: facts.age(),
            marital_status: facts.marital_status(),
            partner_receives_other: facts.partner_receives_other(),
            income: facts.income(),
        }
    }
}

pub fn evaluate_supplement(
    facts: &SupplementFacts,
    pension: &Determination,
    config: &EvaluationConfig,
) -> Result<Determination, UnreachableState> {
    match pension.result() {
        ResultKind::Ineligible => {
            return Ok(Determination::ineligible(
                ReasonCode::DependsOnOtherBenefit,
                "You need to be eligible for the pension to be eligible for the supplement.",
            ));
        }
        ResultKind::Eligible | ResultKind::EligibleAtThresholdAge | ResultKind::Conditional => {}
        unresolved @ (ResultKind::NeedsMoreInfo | ResultKind::Invalid) => {
            return Err(UnreachableState::UnresolvedPension {
                pension: unresolved,
            });
        }
    }

    let missing = |field| UnreachableState::MissingValidatedFact {
        stage: "supplement",
        field,
    };
    let marital_status = facts
        .marital_status
        .ok_or_else(|| missing(FactName::MaritalStatus))?;
    let income = facts.income.ok_or_else(|| missing(FactName::Income))?;
    let age = facts.age.ok_or_else(|| missing(FactName::Age))?;

    let ceiling = if marital_status.is_partnered() {
        let partner_receives_other = facts
            .partner_receives_other
            .ok_or_else(|| missing(FactName::PartnerReceivesOther))?;
        if partner_receives_other {
            config.partnered_with_recipient_income_ceiling
        } else {
            config.partnered_income_ceiling
        }
    } else {
        if facts.partner_receives_other == Some(true) {
            return Err(UnreachableState::InconsistentFacts {
                detail: format!("partner receives the pension while {marital_status:?}"),
            });
        }
        config.single_income_ceiling
    };

    if income > ceiling {
        return Ok(Determination::ineligible(
            ReasonCode::Income,
            format!("Your income is above the supplement limit of {ceiling}."),
        ));
    }

    if age >= config.threshold_age {
        Ok(Determination::eligible(
            "Based on the information provided, you are eligible for the supplement.",
        ))
    } else {
        Ok(Determination::eligible_at_threshold_age(format!(
            "You will be eligible for the supplement when you turn {}.",
            config.threshold_age
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eligible_pension() -> Determination {
        Determination::eligible("pension")
    }

    fn single(income: u64) -> SupplementFacts {
        SupplementFacts {
            age: Some(65),
            marital_status: Some(MaritalStatus::Single),
            partner_receives_other: None,
            income: Some(income),
        }
    }

    fn partnered(income: u64, partner_receives_other: bool) -> SupplementFacts {
        SupplementFacts {
            age: Some(70),
            marital_status: Some(MaritalStatus::CommonLaw),
            partner_receives_other: Some(partner_receives_other),
            income: Some(income),
        }
    }

    fn evaluate(facts: SupplementFacts, pension: &Determination) -> Determination {
        evaluate_supplement(&facts, pension, &EvaluationConfig::default())
            .expect("facts are complete")
    }

    #[test]
    fn ineligible_pension_blocks_supplement_without_other_facts() {
        let pension = Determination::ineligible(ReasonCode::YearsResident, "short");
        let outcome = evaluate(SupplementFacts::default(), &pension);
        assert_eq!(outcome.result(), ResultKind::Ineligible);
        assert_eq!(outcome.reason(), ReasonCode::DependsOnOtherBenefit);
    }

    #[test]
    fn single_ceiling_is_inclusive() {
        let outcome = evaluate(single(18_216), &eligible_pension());
        assert_eq!(outcome.result(), ResultKind::Eligible);

        let outcome = evaluate(single(18_217), &eligible_pension());
        assert_eq!(outcome.result(), ResultKind::Ineligible);
        assert_eq!(outcome.reason(), ReasonCode::Income);
    }

    #[test]
    fn partnered_ceiling_depends_on_partner_benefit() {
        assert!(evaluate(partnered(43_680, false), &eligible_pension()).is_eligible());
        assert!(!evaluate(partnered(43_681, false), &eligible_pension()).is_eligible());
        assert!(evaluate(partnered(24_048, true), &eligible_pension()).is_eligible());
        assert!(!evaluate(partnered(24_049, true), &eligible_pension()).is_eligible());
    }

    #[test]
    fn conditional_pension_still_allows_supplement() {
        let pension = Determination::conditional(ReasonCode::YearsResident, "agreement");
        assert!(evaluate(single(1_000), &pension).is_eligible());
    }

    #[test]
    fn under_threshold_age_is_eligible_later() {
        let facts = SupplementFacts {
            age: Some(60),
            ..single(10_000)
        };
        let outcome = evaluate(facts, &eligible_pension());
        assert_eq!(outcome.result(), ResultKind::EligibleAtThresholdAge);
        assert_eq!(outcome.reason(), ReasonCode::Age);
    }

    #[test]
    fn missing_income_is_a_rule_table_bug() {
        let facts = SupplementFacts {
            income: None,
            ..single(0)
        };
        let err = evaluate_supplement(&facts, &eligible_pension(), &EvaluationConfig::default())
            .expect_err("income is required");
        assert_eq!(
            err,
            UnreachableState::MissingValidatedFact {
                stage: "supplement",
                field: FactName::Income,
            }
        );
    }

    #[test]
    fn unresolved_pension_is_a_rule_table_bug() {
        let pension = Determination::needs_more_info(vec![FactName::Age]);
        let err = evaluate_supplement(&single(0), &pension, &EvaluationConfig::default())
            .expect_err("pension must be resolved");
        assert!(matches!(err, UnreachableState::UnresolvedPension { .. }));
    }

    #[test]
    fn partner_flag_without_partner_is_a_rule_table_bug() {
        let facts = SupplementFacts {
            partner_receives_other: Some(true),
            ..single(10_000)
        };
        let err = evaluate_supplement(&facts, &eligible_pension(), &EvaluationConfig::default())
            .expect_err("single applicants have no partner");
        assert!(matches!(err, UnreachableState::InconsistentFacts { .. }));
    }
}
