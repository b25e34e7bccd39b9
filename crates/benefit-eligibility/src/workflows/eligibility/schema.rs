use std::collections::BTreeMap;

use super::domain::{FactName, FactValue, LegalStatus, MaritalStatus, ResultKind};

pub const MAX_AGE: i64 = 150;
/// Residency is counted from this age onward.
pub const RESIDENCY_START_AGE: i64 = 18;

/// Type and legal value set of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    Integer { min: i64, max: Option<i64> },
    Boolean,
    Text,
    OneOf(&'static [&'static str]),
}

impl FactKind {
    pub const fn label(self) -> &'static str {
        match self {
            FactKind::Integer { .. } => "integer",
            FactKind::Boolean => "boolean",
            FactKind::Text => "non-empty string",
            FactKind::OneOf(_) => "string",
        }
    }
}

/// Predicate over the facts known so far and the prior stage's outcome.
///
/// Evaluates to `None` when a referenced fact is absent, so callers can tell "false" apart
/// from "cannot tell yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    FieldIn {
        field: FactName,
        values: &'static [&'static str],
    },
    /// Holds while no prior outcome is known.
    PriorOutcomeIsNot(ResultKind),
    All(Vec<Condition>),
}

impl Condition {
    /// First fact the condition inspects.
    pub fn subject(&self) -> Option<FactName> {
        match self {
            Condition::FieldIn { field, .. } => Some(*field),
            Condition::PriorOutcomeIsNot(_) => None,
            Condition::All(conditions) => conditions.iter().find_map(Condition::subject),
        }
    }

    pub fn evaluate(
        &self,
        known: &BTreeMap<FactName, FactValue>,
        prior: Option<ResultKind>,
    ) -> Option<bool> {
        match self {
            Condition::FieldIn { field, values } => known
                .get(field)
                .and_then(FactValue::as_text)
                .map(|text| values.contains(&text)),
            Condition::PriorOutcomeIsNot(excluded) => {
                Some(prior.map_or(true, |outcome| outcome != *excluded))
            }
            Condition::All(conditions) => {
                let mut undecided = false;
                for condition in conditions {
                    match condition.evaluate(known, prior) {
                        Some(false) => return Some(false),
                        None => undecided = true,
                        Some(true) => {}
                    }
                }
                if undecided {
                    None
                } else {
                    Some(true)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Always,
    When(Condition),
}

impl Requirement {
    pub fn is_required(
        &self,
        known: &BTreeMap<FactName, FactValue>,
        prior: Option<ResultKind>,
    ) -> bool {
        match self {
            Requirement::Optional => false,
            Requirement::Always => true,
            Requirement::When(condition) => condition.evaluate(known, prior) == Some(true),
        }
    }
}

/// Cross-field rule checked once both sides are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// `field` must not exceed `reference - offset`.
    AtMostOffsetOf {
        field: FactName,
        reference: FactName,
        offset: i64,
    },
    /// `field` may only be `true` while `condition` holds.
    TrueOnlyWhen {
        field: FactName,
        condition: Condition,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FactName,
    pub kind: FactKind,
    pub requirement: Requirement,
}

impl FieldSpec {
    fn new(name: FactName, requirement: Requirement) -> Self {
        Self {
            name,
            kind: kind_of(name),
            requirement,
        }
    }
}

/// Declarative description of one evaluation stage's inputs.
///
/// Every schema declares all facts so that supplied-but-unneeded facts are still type checked;
/// stages differ only in their requirement rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSchema {
    stage: &'static str,
    fields: Vec<FieldSpec>,
    constraints: Vec<Constraint>,
}

impl FactSchema {
    pub fn pension() -> Self {
        Self {
            stage: "pension",
            fields: vec![
                FieldSpec::new(FactName::Age, Requirement::Always),
                FieldSpec::new(FactName::Country, Requirement::Always),
                FieldSpec::new(FactName::LegalStatus, Requirement::Always),
                FieldSpec::new(FactName::YearsResident, Requirement::Always),
                FieldSpec::new(FactName::MaritalStatus, Requirement::Optional),
                FieldSpec::new(FactName::PartnerReceivesOther, Requirement::Optional),
                FieldSpec::new(FactName::Income, Requirement::Optional),
            ],
            constraints: shared_constraints(),
        }
    }

    /// Supplement inputs. The pension outcome arrives as the prior outcome of the fact set.
    pub fn supplement() -> Self {
        let pension_not_ineligible = Condition::PriorOutcomeIsNot(ResultKind::Ineligible);
        Self {
            stage: "supplement",
            fields: vec![
                FieldSpec::new(FactName::Age, Requirement::Optional),
                FieldSpec::new(FactName::Country, Requirement::Optional),
                FieldSpec::new(FactName::LegalStatus, Requirement::Optional),
                FieldSpec::new(FactName::YearsResident, Requirement::Optional),
                FieldSpec::new(
                    FactName::MaritalStatus,
                    Requirement::When(pension_not_ineligible.clone()),
                ),
                FieldSpec::new(
                    FactName::PartnerReceivesOther,
                    Requirement::When(Condition::All(vec![
                        pension_not_ineligible.clone(),
                        partnered(),
                    ])),
                ),
                FieldSpec::new(FactName::Income, Requirement::When(pension_not_ineligible)),
            ],
            constraints: shared_constraints(),
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn field(&self, name: FactName) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

fn partnered() -> Condition {
    Condition::FieldIn {
        field: FactName::MaritalStatus,
        values: MaritalStatus::PARTNERED,
    }
}

fn shared_constraints() -> Vec<Constraint> {
    vec![
        Constraint::AtMostOffsetOf {
            field: FactName::YearsResident,
            reference: FactName::Age,
            offset: RESIDENCY_START_AGE,
        },
        Constraint::TrueOnlyWhen {
            field: FactName::PartnerReceivesOther,
            condition: partnered(),
        },
    ]
}

fn kind_of(name: FactName) -> FactKind {
    match name {
        FactName::Age => FactKind::Integer {
            min: 0,
            max: Some(MAX_AGE),
        },
        FactName::Country => FactKind::Text,
        FactName::LegalStatus => FactKind::OneOf(LegalStatus::VALUES),
        FactName::YearsResident => FactKind::Integer {
            min: 0,
            max: Some(MAX_AGE - RESIDENCY_START_AGE),
        },
        FactName::MaritalStatus => FactKind::OneOf(MaritalStatus::VALUES),
        FactName::PartnerReceivesOther => FactKind::Boolean,
        FactName::Income => FactKind::Integer { min: 0, max: None },
    }
}
