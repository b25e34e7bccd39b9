use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::domain::{
    Determination, FactName, FactValue, LegalStatus, MaritalStatus, RawFacts, ResultKind,
};
use super::schema::{Constraint, FactKind, FactSchema};

/// Raw facts plus, for dependent stages, the outcome of the stage before.
#[derive(Debug, Clone, Copy)]
pub struct FactSet<'a> {
    raw: &'a RawFacts,
    prior_outcome: Option<ResultKind>,
}

impl<'a> FactSet<'a> {
    pub fn new(raw: &'a RawFacts) -> Self {
        Self {
            raw,
            prior_outcome: None,
        }
    }

    pub fn with_prior_outcome(self, outcome: ResultKind) -> Self {
        Self {
            prior_outcome: Some(outcome),
            ..self
        }
    }

    pub fn prior_outcome(&self) -> Option<ResultKind> {
        self.prior_outcome
    }

    /// `null` is treated as not supplied.
    fn value(&self, name: FactName) -> Option<&'a Value> {
        self.raw.get(name.as_str()).filter(|value| !value.is_null())
    }

    /// Recognised facts the caller supplied, in declaration order.
    pub fn supplied(&self) -> Vec<FactName> {
        FactName::ALL
            .into_iter()
            .filter(|name| self.value(*name).is_some())
            .collect()
    }
}

/// Fully validated, typed facts for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFacts {
    values: BTreeMap<FactName, FactValue>,
    prior_outcome: Option<ResultKind>,
}

impl ValidatedFacts {
    pub fn get(&self, name: FactName) -> Option<&FactValue> {
        self.values.get(&name)
    }

    pub fn age(&self) -> Option<u32> {
        self.unsigned(FactName::Age)
    }

    pub fn country(&self) -> Option<&str> {
        self.get(FactName::Country).and_then(FactValue::as_text)
    }

    pub fn legal_status(&self) -> Option<LegalStatus> {
        self.get(FactName::LegalStatus)
            .and_then(FactValue::as_text)
            .and_then(LegalStatus::from_token)
    }

    pub fn years_resident(&self) -> Option<u32> {
        self.unsigned(FactName::YearsResident)
    }

    pub fn marital_status(&self) -> Option<MaritalStatus> {
        self.get(FactName::MaritalStatus)
            .and_then(FactValue::as_text)
            .and_then(MaritalStatus::from_token)
    }

    pub fn partner_receives_other(&self) -> Option<bool> {
        self.get(FactName::PartnerReceivesOther)
            .and_then(FactValue::as_bool)
    }

    pub fn income(&self) -> Option<u64> {
        self.get(FactName::Income)
            .and_then(FactValue::as_integer)
            .and_then(|value| u64::try_from(value).ok())
    }

    pub fn prior_outcome(&self) -> Option<ResultKind> {
        self.prior_outcome
    }

    fn unsigned(&self, name: FactName) -> Option<u32> {
        self.get(name)
            .and_then(FactValue::as_integer)
            .and_then(|value| u32::try_from(value).ok())
    }
}

/// Successful resolution: either everything required is present, or these fields are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Complete(ValidatedFacts),
    Incomplete { missing: Vec<FactName> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    Missing,
    WrongType { expected: &'static str },
    OutOfRange { min: i64, max: Option<i64> },
    NotAllowed { allowed: &'static [&'static str] },
    InvalidCombination { related: FactName },
    UnknownField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(field: impl Into<String>, kind: ViolationKind, message: String) -> Self {
        Self {
            field: field.into(),
            kind,
            message,
        }
    }

    fn described(field: &str, kind: ViolationKind) -> Self {
        let message = describe(field, &kind);
        Self::new(field, kind, message)
    }

    pub fn is_missing(&self) -> bool {
        self.kind == ViolationKind::Missing
    }
}

/// Facts that cannot be evaluated because at least one value is wrong rather than absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid facts: {}", summarize(.violations))]
pub struct InvalidFacts {
    pub violations: Vec<Violation>,
}

impl InvalidFacts {
    pub fn determination(&self) -> Determination {
        Determination::invalid(summarize(&self.violations))
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .filter(|violation| !violation.is_missing())
        .map(|violation| violation.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `facts` against `schema` and work out which required facts are still absent.
pub fn resolve(schema: &FactSchema, facts: FactSet<'_>) -> Result<Resolution, InvalidFacts> {
    let mut violations = Vec::new();
    let mut known = BTreeMap::new();

    for key in facts.raw.keys() {
        if FactName::from_key(key).is_none() {
            violations.push(Violation::described(key, ViolationKind::UnknownField));
        }
    }

    for spec in schema.fields() {
        let Some(raw) = facts.value(spec.name) else {
            continue;
        };
        match coerce(spec.kind, raw) {
            Ok(value) => {
                known.insert(spec.name, value);
            }
            Err(kind) => violations.push(Violation::described(spec.name.as_str(), kind)),
        }
    }

    for constraint in schema.constraints() {
        if let Some(violation) = check_constraint(constraint, &known, facts.prior_outcome) {
            violations.push(violation);
        }
    }

    for spec in schema.fields() {
        if facts.value(spec.name).is_none()
            && spec.requirement.is_required(&known, facts.prior_outcome)
        {
            violations.push(Violation::described(spec.name.as_str(), ViolationKind::Missing));
        }
    }

    if violations.iter().any(|violation| !violation.is_missing()) {
        return Err(InvalidFacts { violations });
    }

    if violations.is_empty() {
        return Ok(Resolution::Complete(ValidatedFacts {
            values: known,
            prior_outcome: facts.prior_outcome,
        }));
    }

    let mut missing = Vec::new();
    for violation in &violations {
        if let Some(name) = FactName::from_key(&violation.field) {
            if !missing.contains(&name) {
                missing.push(name);
            }
        }
    }
    Ok(Resolution::Incomplete { missing })
}

fn coerce(kind: FactKind, raw: &Value) -> Result<FactValue, ViolationKind> {
    let wrong_type = || ViolationKind::WrongType {
        expected: kind.label(),
    };

    match kind {
        FactKind::Integer { min, max } => {
            let out_of_range = ViolationKind::OutOfRange { min, max };
            let wide = match raw {
                Value::Number(number) if number.is_u64() => number.as_u64().map(i128::from),
                Value::Number(number) => number.as_i64().map(i128::from).or_else(|| {
                    number
                        .as_f64()
                        .filter(|float| float.fract() == 0.0 && float.abs() < 1e15)
                        .map(|float| float as i128)
                }),
                Value::String(text) => text.trim().parse::<i128>().ok(),
                _ => None,
            }
            .ok_or_else(wrong_type)?;

            let value = i64::try_from(wide).map_err(|_| out_of_range.clone())?;
            if value < min || max.is_some_and(|max| value > max) {
                return Err(out_of_range);
            }
            Ok(FactValue::Integer(value))
        }
        FactKind::Boolean => match raw {
            Value::Bool(flag) => Ok(FactValue::Boolean(*flag)),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(FactValue::Boolean(true)),
                "false" => Ok(FactValue::Boolean(false)),
                _ => Err(wrong_type()),
            },
            _ => Err(wrong_type()),
        },
        FactKind::Text => match raw {
            Value::String(text) if !text.trim().is_empty() => {
                Ok(FactValue::Text(text.trim().to_string()))
            }
            _ => Err(wrong_type()),
        },
        FactKind::OneOf(allowed) => {
            let Value::String(text) = raw else {
                return Err(wrong_type());
            };
            let normalized = text.trim().to_ascii_lowercase();
            allowed
                .iter()
                .find(|candidate| **candidate == normalized)
                .map(|candidate| FactValue::Text((*candidate).to_string()))
                .ok_or(ViolationKind::NotAllowed { allowed })
        }
    }
}

fn check_constraint(
    constraint: &Constraint,
    known: &BTreeMap<FactName, FactValue>,
    prior: Option<ResultKind>,
) -> Option<Violation> {
    match constraint {
        Constraint::AtMostOffsetOf {
            field,
            reference,
            offset,
        } => {
            let value = known.get(field)?.as_integer()?;
            let limit = known.get(reference)?.as_integer()? - offset;
            (value > limit).then(|| {
                Violation::new(
                    field.as_str(),
                    ViolationKind::InvalidCombination {
                        related: *reference,
                    },
                    format!("\"{field}\" must be less than or equal to {reference} - {offset} ({limit})"),
                )
            })
        }
        Constraint::TrueOnlyWhen { field, condition } => {
            let flag = known.get(field)?.as_bool()?;
            let related = condition.subject().unwrap_or(*field);
            (flag && condition.evaluate(known, prior) == Some(false)).then(|| {
                Violation::described(field.as_str(), ViolationKind::InvalidCombination { related })
            })
        }
    }
}

fn describe(name: &str, kind: &ViolationKind) -> String {
    match kind {
        ViolationKind::Missing => format!("\"{name}\" is required"),
        ViolationKind::WrongType { expected } => {
            let article = if expected.starts_with(['a', 'e', 'i', 'o', 'u']) {
                "an"
            } else {
                "a"
            };
            format!("\"{name}\" must be {article} {expected}")
        }
        ViolationKind::OutOfRange { min, max: Some(max) } => {
            format!("\"{name}\" must be between {min} and {max}")
        }
        ViolationKind::OutOfRange { min, max: None } => {
            format!("\"{name}\" must be greater than or equal to {min}")
        }
        ViolationKind::NotAllowed { allowed } => {
            format!("\"{name}\" must be one of [{}]", allowed.join(", "))
        }
        ViolationKind::InvalidCombination { related } => {
            format!("\"{name}\" conflicts with \"{related}\"")
        }
        ViolationKind::UnknownField => format!("\"{name}\" is not allowed"),
    }
}
