use super::super::country::CountryClassifier;
use super::super::domain::{
    CountryCategory, Determination, FactName, LegalStatus, ReasonCode,
};
use super::super::resolver::ValidatedFacts;
use super::config::EvaluationConfig;
use super::UnreachableState;

/// The subset of validated facts the pension rules consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PensionFacts {
    pub age: u32,
    pub country: CountryCategory,
    pub legal_status: LegalStatus,
    pub years_resident: u32,
}

impl PensionFacts {
    pub fn from_validated(
        facts: &ValidatedFacts,
        classifier: &dyn CountryClassifier,
    ) -> Result<Self, UnreachableState> {
        let missing = |field| UnreachableState::MissingValidatedFact {
            stage: "pension",
            field,
        };
        let country = facts.country().ok_or_else(|| missing(FactName::Country))?;

        Ok(Self {
            age: facts.age().ok_or_else(|| missing(FactName::Age))?,
            country: classifier.classify(country),
            legal_status: facts
                .legal_status()
                .ok_or_else(|| missing(FactName::LegalStatus))?,
            years_resident: facts
                .years_resident()
                .ok_or_else(|| missing(FactName::YearsResident))?,
        })
    }
}

pub fn evaluate_pension(
    facts: &PensionFacts,
    config: &EvaluationConfig,
) -> Result<Determination, UnreachableState> {
    let required_years = if facts.country == CountryCategory::Home {
        config.home_residency_years
    } else {
        config.abroad_residency_years
    };
    let qualifying = facts.legal_status.is_qualifying();
    let short_of_years = facts.years_resident < required_years;

    if qualifying && !short_of_years {
        if facts.age >= config.threshold_age {
            return Ok(Determination::eligible(
                "Based on the information provided, you are eligible for the pension.",
            ));
        }
        return Ok(Determination::eligible_at_threshold_age(format!(
            "You will be eligible for the pension when you turn {}.",
            config.threshold_age
        )));
    }

    if facts.country == CountryCategory::Agreement && short_of_years {
        return Ok(Determination::conditional(
            ReasonCode::YearsResident,
            "Eligibility depends on the social security agreement with your country of residence.",
        ));
    }

    if short_of_years {
        return Ok(Determination::ineligible(
            ReasonCode::YearsResident,
            format!("You need at least {required_years} years of residence since age 18."),
        ));
    }

    if !qualifying {
        return Ok(Determination::ineligible(
            ReasonCode::Citizenship,
            "Your legal status does not qualify for the pension.",
        ));
    }

    if facts.country != CountryCategory::Agreement {
        return Ok(Determination::ineligible(
            ReasonCode::Agreement,
            "Your country of residence has no social security agreement.",
        ));
    }

    Err(UnreachableState::PensionFallthrough {
        facts: format!("{facts:?}"),
    })
}
