use crate::cli::ServeArgs;
use crate::infra::{default_evaluation_config, load_registry, AppState};
use crate::routes::with_eligibility_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefit_eligibility::config::AppConfig;
use benefit_eligibility::error::AppError;
use benefit_eligibility::telemetry;
use benefit_eligibility::workflows::eligibility::EligibilityService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registry = load_registry(&config.countries)?;
    let service = Arc::new(EligibilityService::new(
        registry,
        default_evaluation_config(),
    ));
    let thresholds = service.config();
    info!(
        threshold_age = thresholds.threshold_age,
        single_income_ceiling = thresholds.single_income_ceiling,
        partnered_income_ceiling = thresholds.partnered_income_ceiling,
        "evaluation thresholds loaded"
    );

    let app = with_eligibility_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "benefit eligibility estimator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
