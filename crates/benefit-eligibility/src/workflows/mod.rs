pub mod eligibility;
