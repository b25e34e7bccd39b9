use super::common::*;
use axum::body::{to_bytes, Body};
use axum::extract::{Query, State};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tower::ServiceExt;

use crate::workflows::eligibility::router::{body_handler, query_handler};
use crate::workflows::eligibility::{eligibility_router, AgreementRegistry};

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn query_handler_coerces_string_parameters() {
    let params: BTreeMap<String, String> = [
        ("age", "65"),
        ("country", "Canada"),
        ("legalStatus", "citizen"),
        ("yearsResident", "10"),
        ("maritalStatus", "single"),
        ("income", "18216"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect();

    let response =
        query_handler::<AgreementRegistry>(State(service()), Query(params)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pension"]["result"], "ELIGIBLE");
    assert_eq!(body["supplement"]["result"], "ELIGIBLE");
    assert!(body["supplement"].get("missingFields").is_none());
}

#[tokio::test]
async fn body_handler_rejects_invalid_combination() {
    let raw = facts(json!({ "maritalStatus": "single", "partnerReceivesOther": true }));

    let response = body_handler::<AgreementRegistry>(State(service()), axum::Json(raw)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Request is invalid!");
    assert_eq!(body["result"]["result"], "INVALID");
    assert_eq!(body["result"]["reason"], "INVALID_COMBINATION");
    let detail = body["detail"].as_array().expect("violation list");
    assert!(detail.iter().any(|violation| {
        violation["field"] == "partnerReceivesOther" && violation["type"] == "invalid_combination"
    }));
}

#[tokio::test]
async fn get_route_reports_missing_fields() {
    let router = eligibility_router(service());

    let response = router
        .oneshot(
            Request::get("/api/v1/eligibility?age=64")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pension"]["result"], "NEEDS_MORE_INFO");
    assert_eq!(
        body["pension"]["missingFields"],
        json!(["country", "legalStatus", "yearsResident"])
    );
    assert_eq!(
        body["allFields"],
        json!([
            "age",
            "country",
            "legalStatus",
            "yearsResident",
            "maritalStatus",
            "income"
        ])
    );
}

#[tokio::test]
async fn post_route_accepts_json_facts() {
    let router = eligibility_router(service());
    let payload = json!({
        "age": 65,
        "country": "agreement",
        "legalStatus": "citizen",
        "yearsResident": 19,
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&payload).expect("payload serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["pension"]["result"], "CONDITIONAL");
    assert_eq!(body["pension"]["reason"], "YEARS_RESIDENT");
    assert_eq!(body["supplement"]["missingFields"], json!(["maritalStatus", "income"]));
}

#[tokio::test]
async fn post_route_rejects_out_of_range_age() {
    let router = eligibility_router(service());

    let response = router
        .oneshot(
            Request::post("/api/v1/eligibility")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"age": 151}"#))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
