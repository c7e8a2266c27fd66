use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use psymetric::assessments::builtin;
use psymetric::assessments::catalog::MemoryCatalog;
use psymetric::assessments::domain::{Answer, ContactRecord, TestDefinition};
use psymetric::assessments::routes::{assessment_router, AssessmentApi};
use psymetric::assessments::submission::{MemoryResultStore, ResultPayload, ResultRepository};
use serde_json::Value;
use tower::util::ServiceExt;

fn router() -> axum::Router {
    let api = Arc::new(AssessmentApi::new(
        Arc::new(MemoryCatalog::with_definitions(builtin::all())),
        Arc::new(MemoryResultStore::new()),
    ));
    assessment_router(api)
}

fn result_payload() -> ResultPayload {
    ResultPayload {
        test_id: "builtin-anxiety".to_string(),
        test_slug: builtin::ANXIETY_SLUG.to_string(),
        answers: vec![Answer {
            question_id: "anx-1".to_string(),
            value: 2.0,
            weight: 1.0,
        }],
        total_score: 2.0,
        interpretation: Some("Minimal anxiety".to_string()),
        severity: Some("minimal".to_string()),
        user_info: ContactRecord {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
        },
    }
}

#[tokio::test]
async fn get_active_test_by_slug_returns_definition() {
    let request = Request::builder()
        .uri(format!("/api/tests/{}", builtin::ANXIETY_SLUG))
        .body(Body::empty())
        .expect("request builds");

    let response = router().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let definition: TestDefinition = serde_json::from_slice(&body).expect("definition json");
    assert_eq!(definition.slug, builtin::ANXIETY_SLUG);
    assert!(!definition.questions.is_empty());
}

#[tokio::test]
async fn unknown_slug_maps_to_not_found_with_error_body() {
    let request = Request::builder()
        .uri("/api/tests/no-such-test")
        .body(Body::empty())
        .expect("request builds");

    let response = router().oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), 1024).await.expect("read body");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(
        value.get("error").and_then(Value::as_str),
        Some("test not found")
    );
}

#[tokio::test]
async fn retired_test_is_not_served() {
    let catalog = Arc::new(MemoryCatalog::with_definitions(builtin::all()));
    catalog.retire(builtin::ANXIETY_SLUG);
    let api = Arc::new(AssessmentApi::new(
        catalog,
        Arc::new(MemoryResultStore::new()),
    ));

    let request = Request::builder()
        .uri(format!("/api/tests/{}", builtin::ANXIETY_SLUG))
        .body(Body::empty())
        .expect("request builds");

    let response = assessment_router(api)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn save_test_result_round_trips_through_the_store() {
    let repository = Arc::new(MemoryResultStore::new());
    let api = Arc::new(AssessmentApi::new(
        Arc::new(MemoryCatalog::with_definitions(builtin::all())),
        repository.clone(),
    ));

    let body = serde_json::to_vec(&result_payload()).expect("payload serializes");
    let request = Request::builder()
        .method("POST")
        .uri("/api/saveTestResult")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds");

    let response = assessment_router(api)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.expect("read body");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(value.get("success").and_then(Value::as_bool), Some(true));
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn save_accepts_the_camel_case_body_the_site_sends() {
    let repository = Arc::new(MemoryResultStore::new());
    let api = Arc::new(AssessmentApi::new(
        Arc::new(MemoryCatalog::with_definitions(builtin::all())),
        repository.clone(),
    ));

    // Body shaped exactly as the embedding site posts it.
    let body = r#"{
        "testId": "builtin-anxiety",
        "testSlug": "anxiety-self-check",
        "answers": [{ "questionId": "anx-1", "value": 2.0, "weight": 1.0 }],
        "totalScore": 2.0,
        "interpretation": "Minimal anxiety",
        "severity": "minimal",
        "userInfo": {
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@example.com",
            "phone": null
        }
    }"#;
    let request = Request::builder()
        .method("POST")
        .uri("/api/saveTestResult")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds");

    let response = assessment_router(api)
        .oneshot(request)
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.expect("read body");
    let value: Value = serde_json::from_slice(&body).expect("json body");
    let result_id = value
        .get("resultId")
        .and_then(Value::as_str)
        .expect("result id present");

    let stored = repository
        .fetch(result_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.payload.total_score, 2.0);
    assert_eq!(stored.payload.user_info.first_name, "Jane");
    assert_eq!(stored.payload.answers[0].question_id, "anx-1");
}
