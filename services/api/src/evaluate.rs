use crate::infra::{default_evaluation_config, load_registry, parse_fact};
use benefit_eligibility::config::AppConfig;
use benefit_eligibility::error::AppError;
use benefit_eligibility::workflows::eligibility::{
    EligibilityError, EligibilityReport, EligibilityService, RawFacts, INVALID_REQUEST_MESSAGE,
};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// A fact as NAME=VALUE (repeatable), e.g. --fact age=65 --fact country=Canada
    #[arg(long = "fact", value_parser = parse_fact)]
    pub(crate) facts: Vec<(String, String)>,
    /// CSV export of agreement countries (overrides APP_AGREEMENT_CSV)
    #[arg(long)]
    pub(crate) agreements: Option<PathBuf>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.agreements {
        config.countries.agreement_csv = Some(path);
    }

    let registry = load_registry(&config.countries)?;
    let service = EligibilityService::new(registry, default_evaluation_config());

    let raw = raw_facts(args.facts);
    let outcome = service.evaluate(&raw);
    println!("{}", render(&outcome));

    outcome.map(|_| ()).map_err(AppError::from)
}

fn raw_facts(facts: Vec<(String, String)>) -> RawFacts {
    facts
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}

fn render(outcome: &Result<EligibilityReport, EligibilityError>) -> String {
    let value = match outcome {
        Ok(report) => json!(report),
        Err(EligibilityError::Invalid(invalid)) => json!({
            "error": INVALID_REQUEST_MESSAGE,
            "result": invalid.determination(),
            "detail": invalid.violations,
        }),
        Err(other) => json!({ "error": other.to_string() }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
