use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;

use super::country::CountryClassifier;
use super::domain::RawFacts;
use super::service::EligibilityService;
use crate::error::AppError;

/// Router builder exposing the evaluator over query strings and JSON bodies.
pub fn eligibility_router<C>(service: Arc<EligibilityService<C>>) -> Router
where
    C: CountryClassifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/eligibility",
            get(query_handler::<C>).post(body_handler::<C>),
        )
        .with_state(service)
}

pub(crate) async fn query_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response
where
    C: CountryClassifier + 'static,
{
    let raw: RawFacts = params
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();
    respond(&service, &raw)
}

pub(crate) async fn body_handler<C>(
    State(service): State<Arc<EligibilityService<C>>>,
    axum::Json(raw): axum::Json<RawFacts>,
) -> Response
where
    C: CountryClassifier + 'static,
{
    respond(&service, &raw)
}

fn respond<C>(service: &EligibilityService<C>, raw: &RawFacts) -> Response
where
    C: CountryClassifier,
{
    match service.evaluate(raw) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
