use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Facts exactly as the caller supplied them, keyed by fact name.
pub type RawFacts = BTreeMap<String, serde_json::Value>;

/// Every fact the evaluator understands, in schema declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FactName {
    Age,
    Country,
    LegalStatus,
    YearsResident,
    MaritalStatus,
    PartnerReceivesOther,
    Income,
}

impl FactName {
    pub const ALL: [FactName; 7] = [
        FactName::Age,
        FactName::Country,
        FactName::LegalStatus,
        FactName::YearsResident,
        FactName::MaritalStatus,
        FactName::PartnerReceivesOther,
        FactName::Income,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FactName::Age => "age",
            FactName::Country => "country",
            FactName::LegalStatus => "legalStatus",
            FactName::YearsResident => "yearsResident",
            FactName::MaritalStatus => "maritalStatus",
            FactName::PartnerReceivesOther => "partnerReceivesOther",
            FactName::Income => "income",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == key)
    }
}

impl fmt::Display for FactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fact value after type coercion and range checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl FactValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FactValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Residence classification produced by the country classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryCategory {
    Home,
    Agreement,
    Other,
}

/// Legal or residency status declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegalStatus {
    Citizen,
    PermanentResident,
    StatusIndian,
    TemporaryResident,
    Other,
}

impl LegalStatus {
    pub const VALUES: &'static [&'static str] = &[
        "citizen",
        "permanent-resident",
        "status-indian",
        "temporary-resident",
        "other",
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "citizen" => Some(Self::Citizen),
            "permanent-resident" => Some(Self::PermanentResident),
            "status-indian" => Some(Self::StatusIndian),
            "temporary-resident" => Some(Self::TemporaryResident),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Statuses that count toward the pension residency test.
    pub const fn is_qualifying(self) -> bool {
        !matches!(self, LegalStatus::Other)
    }
}

/// Marital category declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaritalStatus {
    Single,
    Married,
    CommonLaw,
    Widowed,
    Divorced,
    Separated,
}

impl MaritalStatus {
    pub const VALUES: &'static [&'static str] = &[
        "single",
        "married",
        "common-law",
        "widowed",
        "divorced",
        "separated",
    ];

    pub const PARTNERED: &'static [&'static str] = &["married", "common-law"];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "single" => Some(Self::Single),
            "married" => Some(Self::Married),
            "common-law" => Some(Self::CommonLaw),
            "widowed" => Some(Self::Widowed),
            "divorced" => Some(Self::Divorced),
            "separated" => Some(Self::Separated),
            _ => None,
        }
    }

    pub const fn is_partnered(self) -> bool {
        matches!(self, MaritalStatus::Married | MaritalStatus::CommonLaw)
    }
}

/// Outcome category of a single benefit determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultKind {
    Eligible,
    EligibleAtThresholdAge,
    Ineligible,
    Conditional,
    NeedsMoreInfo,
    Invalid,
}

/// Why a determination came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    None,
    Age,
    YearsResident,
    Citizenship,
    Agreement,
    NeedsMoreInfo,
    DependsOnOtherBenefit,
    Income,
    InvalidCombination,
}

/// Result of evaluating one benefit.
///
/// Constructed only through the associated functions so the reason is `NONE` exactly when the
/// result is `ELIGIBLE`, and missing fields are carried exactly when more information is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Determination {
    result: ResultKind,
    reason: ReasonCode,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing_fields: Option<Vec<FactName>>,
}

impl Determination {
    pub fn eligible(detail: impl Into<String>) -> Self {
        Self::concrete(ResultKind::Eligible, ReasonCode::None, detail)
    }

    pub fn eligible_at_threshold_age(detail: impl Into<String>) -> Self {
        Self::concrete(ResultKind::EligibleAtThresholdAge, ReasonCode::Age, detail)
    }

    pub fn ineligible(reason: ReasonCode, detail: impl Into<String>) -> Self {
        debug_assert!(reason != ReasonCode::None);
        Self::concrete(ResultKind::Ineligible, reason, detail)
    }

    pub fn conditional(reason: ReasonCode, detail: impl Into<String>) -> Self {
        debug_assert!(reason != ReasonCode::None);
        Self::concrete(ResultKind::Conditional, reason, detail)
    }

    pub fn needs_more_info(missing_fields: Vec<FactName>) -> Self {
        let listed = missing_fields
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            result: ResultKind::NeedsMoreInfo,
            reason: ReasonCode::NeedsMoreInfo,
            detail: format!("Missing fields: [{listed}]"),
            missing_fields: Some(missing_fields),
        }
    }

    /// Nothing is missing for this benefit itself, but it cannot be decided until the benefit
    /// it depends on is.
    pub fn awaiting_dependency(detail: impl Into<String>) -> Self {
        Self {
            result: ResultKind::NeedsMoreInfo,
            reason: ReasonCode::NeedsMoreInfo,
            detail: detail.into(),
            missing_fields: Some(Vec::new()),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::concrete(ResultKind::Invalid, ReasonCode::InvalidCombination, detail)
    }

    fn concrete(result: ResultKind, reason: ReasonCode, detail: impl Into<String>) -> Self {
        Self {
            result,
            reason,
            detail: detail.into(),
            missing_fields: None,
        }
    }

    pub fn result(&self) -> ResultKind {
        self.result
    }

    pub fn reason(&self) -> ReasonCode {
        self.reason
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn missing_fields(&self) -> Option<&[FactName]> {
        self.missing_fields.as_deref()
    }

    pub fn is_eligible(&self) -> bool {
        matches!(
            self.result,
            ResultKind::Eligible | ResultKind::EligibleAtThresholdAge
        )
    }
}

/// Combined answer for both benefits plus every field involved in reaching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub pension: Determination,
    pub supplement: Determination,
    pub all_fields: Vec<FactName>,
}
