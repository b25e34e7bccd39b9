use proptest::prelude::*;
use serde_json::{json, Value};

use super::common::*;
use crate::workflows::eligibility::{
    EligibilityError, FactName, MaritalStatus, RawFacts, ResultKind,
};

const COUNTRIES: &[&str] = &["home", "agreement", "other", "Canada", "France", "Atlantis"];
const LEGAL_STATUSES: &[&str] = &[
    "citizen",
    "permanent-resident",
    "status-indian",
    "temporary-resident",
    "other",
];

/// Complete, schema-valid fact sets.
fn valid_facts() -> impl Strategy<Value = RawFacts> {
    (18i64..=150)
        .prop_flat_map(|age| {
            (
                Just(age),
                0..=(age - 18),
                prop::sample::select(COUNTRIES),
                prop::sample::select(LEGAL_STATUSES),
                prop::sample::select(MaritalStatus::VALUES),
                any::<bool>(),
                0i64..=60_000,
            )
        })
        .prop_map(|(age, years, country, legal, marital, partner, income)| {
            let partnered = MaritalStatus::PARTNERED.contains(&marital);
            facts(json!({
                "age": age,
                "country": country,
                "legalStatus": legal,
                "yearsResident": years,
                "maritalStatus": marital,
                "partnerReceivesOther": partnered && partner,
                "income": income,
            }))
        })
}

fn subset(raw: &RawFacts, keep: &[bool]) -> RawFacts {
    raw.iter()
        .zip(keep.iter().cycle())
        .filter(|(_, keep)| **keep)
        .map(|((name, value), _)| (name.clone(), value.clone()))
        .collect()
}

fn missing_count(raw: &RawFacts) -> (Option<usize>, Option<usize>) {
    let report = pipeline().evaluate(raw).expect("subsets of valid facts stay valid");
    (
        report.pension.missing_fields().map(<[FactName]>::len),
        report.supplement.missing_fields().map(<[FactName]>::len),
    )
}

proptest! {
    /// Schema-valid input never falls through the rule tables.
    #[test]
    fn valid_facts_never_reach_an_unreachable_state(raw in valid_facts()) {
        let report = pipeline().evaluate(&raw);
        prop_assert!(report.is_ok(), "unexpected error {:?}", report.as_ref().err());
        let report = report.unwrap();
        prop_assert_ne!(report.pension.result(), ResultKind::NeedsMoreInfo);
        prop_assert_ne!(report.supplement.result(), ResultKind::NeedsMoreInfo);
        if report.pension.result() == ResultKind::Ineligible {
            prop_assert!(!report.supplement.is_eligible());
        }
    }

    #[test]
    fn evaluation_is_idempotent(raw in valid_facts(), keep in prop::collection::vec(any::<bool>(), 7)) {
        let partial = subset(&raw, &keep);
        prop_assert_eq!(pipeline().evaluate(&partial), pipeline().evaluate(&partial));
    }

    #[test]
    fn ages_outside_range_are_invalid(
        age in prop_oneof![i64::MIN..0, 151i64..i64::MAX],
        raw in valid_facts(),
    ) {
        let mut raw = raw;
        raw.insert("age".to_string(), json!(age));
        let result = pipeline().evaluate(&raw);
        prop_assert!(matches!(result, Err(EligibilityError::Invalid(_))));
    }

    #[test]
    fn years_beyond_adulthood_are_invalid(age in 0i64..=150, excess in 1i64..=50) {
        let years = (age - 18 + excess).max(0);
        prop_assume!(years > age - 18 && years <= 132);
        let raw = facts(json!({ "age": age, "yearsResident": years }));
        let result = pipeline().evaluate(&raw);
        prop_assert!(matches!(result, Err(EligibilityError::Invalid(_))));
    }

    /// Supplying one more valid fact never lengthens either missing-field list.
    #[test]
    fn adding_facts_never_grows_missing_fields(
        raw in valid_facts(),
        keep in prop::collection::vec(any::<bool>(), 7),
        extra in 0usize..7,
    ) {
        let before = subset(&raw, &keep);
        let mut after = before.clone();
        let name = FactName::ALL[extra].as_str();
        if let Some(value) = raw.get(name) {
            after.insert(name.to_string(), value.clone());
        }

        let (pension_before, supplement_before) = missing_count(&before);
        let (pension_after, supplement_after) = missing_count(&after);
        prop_assert!(pension_after.unwrap_or(0) <= pension_before.unwrap_or(0));
        if let Some(before) = supplement_before {
            prop_assert!(supplement_after.unwrap_or(0) <= before);
        }
    }
}

#[test]
fn partner_flag_without_marital_status_is_not_judged() {
    let raw = facts(json!({ "partnerReceivesOther": Value::Bool(true) }));
    assert!(pipeline().evaluate(&raw).is_ok());
}
