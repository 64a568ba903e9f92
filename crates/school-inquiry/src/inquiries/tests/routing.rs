use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::*;
use crate::inquiries::{inquiry_router, InquiryService};
use crate::store::MemoryStore;

fn json_request(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request")
}

#[tokio::test]
async fn contact_route_returns_created_document() {
    let (service, store, _) = build_service();
    let router = inquiry_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/contact", &contact_payload()))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Contact inquiry submitted successfully");
    let submitted = contact_payload();
    for field in ["name", "email", "phone", "message", "inquiryType"] {
        assert_eq!(body["data"][field], submitted[field], "echoed {field}");
    }
    assert!(body["data"]["_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["data"]["createdAt"].is_string());
    assert_eq!(store.contacts().expect("contacts").len(), 1);
}

#[tokio::test]
async fn contact_without_phone_is_bad_request() {
    let (service, store, _) = build_service();
    let router = inquiry_router(Arc::new(service));
    let mut payload = contact_payload();
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("phone");

    let response = router
        .oneshot(json_request("/api/contact", &payload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "All fields are required");
    assert_eq!(store.document_count(), 0);
}

#[tokio::test]
async fn whitespace_only_field_counts_as_missing() {
    let (service, _, _) = build_service();
    let router = inquiry_router(Arc::new(service));
    let mut payload = admission_payload();
    payload["parentName"] = Value::String("   ".to_string());

    let response = router
        .oneshot(json_request("/api/admissions", &payload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Required fields are missing");
}

#[tokio::test]
async fn unknown_class_is_bad_request() {
    let (service, store, _) = build_service();
    let router = inquiry_router(Arc::new(service));
    let mut payload = admission_payload();
    payload["class"] = Value::String("XII".to_string());

    let response = router
        .oneshot(json_request("/api/admissions", &payload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.document_count(), 0);
}

#[tokio::test]
async fn admission_route_echoes_optional_fields_only_when_present() {
    let (service, _, _) = build_service();
    let router = inquiry_router(Arc::new(service));
    let mut payload = admission_payload();
    payload["address"] = Value::String("12 Lake Road".to_string());

    let response = router
        .oneshot(json_request("/api/admissions", &payload))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Admission inquiry submitted successfully");
    assert_eq!(body["data"]["class"], "UKG");
    assert_eq!(body["data"]["address"], "12 Lake Road");
    assert!(body["data"].get("previousSchool").is_none());
}

#[tokio::test]
async fn failing_notifier_still_returns_created() {
    let store = Arc::new(MemoryStore::default());
    let service = InquiryService::new(store.clone(), Arc::new(FailingNotifier));
    let router = inquiry_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/contact", &contact_payload()))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.contacts().expect("contacts").len(), 1);
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let service = InquiryService::new(
        Arc::new(UnavailableRepository),
        Arc::new(RecordingNotifier::default()),
    );
    let router = inquiry_router(Arc::new(service));

    let response = router
        .oneshot(json_request("/api/admissions", &admission_payload()))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["message"], "Server error. Please try again later.");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (service, store, _) = build_service();
    let router = inquiry_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::post("/api/contact")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.document_count(), 0);
}
