use benefit_eligibility::config::CountryConfig;
use benefit_eligibility::workflows::eligibility::{AgreementRegistry, EvaluationConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn default_evaluation_config() -> EvaluationConfig {
    EvaluationConfig::default()
}

/// Build the country registry from an agreement CSV when one is configured.
pub(crate) fn load_registry(config: &CountryConfig) -> Result<AgreementRegistry, csv::Error> {
    match &config.agreement_csv {
        Some(path) => {
            let registry = AgreementRegistry::from_csv_path(&config.home_country, path)?;
            info!(
                path = %path.display(),
                agreements = registry.agreement_count(),
                "loaded agreement countries"
            );
            Ok(registry)
        }
        None => Ok(AgreementRegistry::with_home(&config.home_country)),
    }
}

pub(crate) fn parse_fact(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing fact name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
