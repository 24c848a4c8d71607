//! Course search and enrollment endpoint tests.
//!
//! # Invariants
//! - Purchase-gated courses answer `200` with `precondition_required`
//! - Already-enrolled users answer `200` with `already_enrolled`

mod common;

use common::*;
use roster_client::SearchQuery;
use wiremock::matchers::{body_json, method, path, query_param};

#[tokio::test]
async fn test_search_courses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(api_path("/courses")))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("courses/search_page_1.json")),
        )
        .mount(&mock_server)
        .await;

    let page = endpoints::search_courses(
        &Client::new(),
        &api_root(&mock_server),
        &token_auth(),
        &SearchQuery::new("", 1, 20),
        0,
        None,
    )
    .await
    .unwrap();

    assert_eq!(page.items.len(), 2);
    assert!(page.items[1].requires_purchase);
    assert_eq!(page.total_filtered, page.total_global);
}

#[tokio::test]
async fn test_enroll_user_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/users/11/enrollments")))
        .and(body_json(serde_json::json!({"course_id": 101})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = endpoints::enroll_user(
        &Client::new(),
        &api_root(&mock_server),
        &token_auth(),
        11,
        101,
        0,
        None,
    )
    .await
    .unwrap();

    assert!(resp.success);
    assert!(!resp.already_enrolled);
    assert!(!resp.precondition_required);
}

#[tokio::test]
async fn test_enroll_user_already_enrolled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/users/11/enrollments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "already_enrolled": true
        })))
        .mount(&mock_server)
        .await;

    let resp = endpoints::enroll_user(
        &Client::new(),
        &api_root(&mock_server),
        &token_auth(),
        11,
        101,
        0,
        None,
    )
    .await
    .unwrap();

    assert!(resp.success);
    assert!(resp.already_enrolled);
}

#[tokio::test]
async fn test_enroll_user_requires_purchase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(api_path("/users/11/enrollments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "precondition_required": true,
            "order_url": "https://academy.example.com/checkout?course=102"
        })))
        .mount(&mock_server)
        .await;

    let resp = endpoints::enroll_user(
        &Client::new(),
        &api_root(&mock_server),
        &token_auth(),
        11,
        102,
        0,
        None,
    )
    .await
    .unwrap();

    assert!(!resp.success);
    assert!(resp.precondition_required);
    assert_eq!(
        resp.order_url.as_deref(),
        Some("https://academy.example.com/checkout?course=102")
    );
}
