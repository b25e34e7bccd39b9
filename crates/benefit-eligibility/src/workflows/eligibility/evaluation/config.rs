use serde::{Deserialize, Serialize};

/// Thresholds for both benefits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub threshold_age: u32,
    pub home_residency_years: u32,
    pub abroad_residency_years: u32,
    pub single_income_ceiling: u64,
    pub partnered_income_ceiling: u64,
    /// Applies when the partner already receives the pension.
    pub partnered_with_recipient_income_ceiling: u64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            threshold_age: 65,
            home_residency_years: 10,
            abroad_residency_years: 20,
            single_income_ceiling: 18_216,
            partnered_income_ceiling: 43_680,
            partnered_with_recipient_income_ceiling: 24_048,
        }
    }
}
