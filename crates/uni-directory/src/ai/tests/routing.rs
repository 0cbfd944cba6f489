use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::ai::router::advisor_router;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn ai_route_returns_model_text_as_json_string() {
    let (service, _) = advisor(seeded_catalog(), ScriptedGenerator::replying("Hello!"));
    let router = advisor_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/ai",
            json!({ "template": "Greet:", "text": "me" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!("Hello!"));
}

#[tokio::test]
async fn ai_route_maps_generator_failure_to_bad_gateway() {
    let (service, _) = advisor(seeded_catalog(), ScriptedGenerator::failing("dns"));
    let router = advisor_router(Arc::new(service));

    let response = router
        .oneshot(post_json("/api/ai", json!({ "template": "", "text": "x" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].as_str().unwrap_or_default().contains("dns"));
}

#[tokio::test]
async fn recommend_route_returns_stored_university() {
    let (service, _) = advisor(
        seeded_catalog(),
        ScriptedGenerator::replying(r#"{"university_name": "Oxford", "short_reason": "?"}"#),
    );
    let router = advisor_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/advisor/recommend",
            json!({
                "ent_score": 95,
                "profile_subjects": "Biology, Chemistry",
                "interests": "medicine",
                "preferred_city": "Almaty",
                "career_goal": "surgeon",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["university_name"], json!("KBTU"));
    assert!(payload["short_reason"].is_string());
}

#[tokio::test]
async fn recommend_route_reports_empty_directory() {
    let (service, _) = advisor(empty_catalog(), ScriptedGenerator::replying("{}"));
    let router = advisor_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/advisor/recommend",
            json!({
                "ent_score": 95,
                "profile_subjects": "Math",
                "interests": "art",
                "preferred_city": "Almaty",
                "career_goal": "designer",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recommend_route_rejects_incomplete_profiles() {
    let (service, _) = advisor(seeded_catalog(), ScriptedGenerator::replying("{}"));
    let router = advisor_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/advisor/recommend",
            json!({ "ent_score": "high" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn ai_route_rejects_non_json_body_with_json_error() {
    let (service, _) = advisor(seeded_catalog(), ScriptedGenerator::replying("unused"));
    let router = advisor_router(Arc::new(service));

    let request = Request::post("/api/ai")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"template\": 3"))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"].is_string());
}
