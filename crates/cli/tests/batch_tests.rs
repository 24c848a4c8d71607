//! Integration tests for the batch commands.
//!
//! Tests cover:
//! - Exit codes for full success, partial failure and full failure
//! - The delete confirmation phrase (`--confirm`, configured phrase, no terminal)
//! - `--dry-run`, `--bulk`, `create --file` and enrollment escalation
//! - Eligibility filtering of suspend/unsuspend targets after the id lookup
//! - Input errors that must stop the command before any provider call
//! - `--metrics-file` output

mod common;

use common::*;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_suspend_all_succeed_exits_0() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, false), (2, false)]).await;
    mount_suspension(&server, 1, 200, json!({"success": true})).await;
    mount_suspension(&server, 2, 200, json!({"success": true, "already_in_state": true})).await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1,2", "--reason", "audit", "--yes", "--quiet"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("unchanged").and(predicate::str::contains(
            "2 successful, 0 failed",
        )));
}

#[tokio::test]
async fn test_partial_failure_exits_10_and_lists_failures() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, true), (3, true)]).await;
    mount_suspension(&server, 1, 200, json!({"success": true})).await;
    mount_suspension(
        &server,
        2,
        404,
        json!({"code": "rest_user_invalid_id", "message": "Invalid user ID.", "data": {"status": 404}}),
    )
    .await;
    mount_suspension(&server, 3, 200, json!({"success": true})).await;

    roster_cmd_for(&server)
        .args(["unsuspend", "--ids", "1,2,3", "--yes", "--quiet"])
        .assert()
        .code(10)
        .stdout(
            predicate::str::contains("2 successful, 1 failed")
                .and(predicate::str::contains("  - 2: ")),
        );
}

#[tokio::test]
async fn test_every_item_failed_exits_11() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, false), (2, false)]).await;
    mount_suspension(&server, 1, 500, json!({"code": "internal", "message": "boom"})).await;
    mount_suspension(&server, 2, 500, json!({"code": "internal", "message": "boom"})).await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1,2", "--yes", "--quiet"])
        .assert()
        .code(11)
        .stdout(predicate::str::contains("0 successful, 2 failed"));
}

#[tokio::test]
async fn test_suspend_skips_already_suspended_targets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/users")))
        .and(query_param("include", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 1, "username": "ana", "is_suspended": false},
                {"id": 2, "username": "ben", "is_suspended": false},
                {"id": 3, "username": "cy", "is_suspended": true}
            ],
            "has_more": false,
            "total_filtered": 3,
            "total_global": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_suspension(&server, 1, 200, json!({"success": true})).await;
    mount_suspension(&server, 2, 200, json!({"success": true})).await;
    Mock::given(method("POST"))
        .and(path(api("/users/3/suspension")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1,2,3", "--yes", "--quiet"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("2 successful, 0 failed"))
        .stderr(predicate::str::contains(
            "Skipping 1 target(s) not eligible for suspend: 3",
        ));
}

#[tokio::test]
async fn test_nothing_eligible_exits_0_without_prompting() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(4, false), (5, false)]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["unsuspend", "--ids", "4,5", "--quiet"])
        .assert()
        .code(0)
        .stderr(
            predicate::str::contains("not eligible for unsuspend: 4,5")
                .and(predicate::str::contains("Nothing to unsuspend")),
        );
}

#[tokio::test]
async fn test_failed_lookup_stops_before_any_write() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("/users")))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({"code": "rest_forbidden", "message": "Sorry, you are not allowed to do that."}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1,2", "--yes", "--quiet"])
        .assert()
        .code(2);
}

#[tokio::test]
async fn test_json_report_output() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(4, false)]).await;
    mount_suspension(&server, 4, 200, json!({"success": true})).await;

    let output = roster_cmd_for(&server)
        .args(["suspend", "--ids", "4", "--yes", "--quiet", "--output", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["action"], "SUSPEND");
    assert_eq!(report["status"], "success");
    assert_eq!(report["items"][0]["target_id"], 4);
    assert_eq!(report["items"][0]["success"], true);
}

#[tokio::test]
async fn test_delete_wrong_phrase_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["delete", "--ids", "1,2", "--confirm", "delete", "--quiet"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not confirmed"));
}

#[tokio::test]
async fn test_delete_without_terminal_requires_confirm_flag() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["delete", "--ids", "1", "--yes", "--quiet"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("--confirm"));
}

#[tokio::test]
async fn test_delete_with_configured_phrase_and_reassignment() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(api("/users/7")))
        .and(wiremock::matchers::query_param("reassign", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .env("ROSTER_CONFIRM_PHRASE", "ELIMINAR")
        .args([
            "delete",
            "--ids",
            "7",
            "--reassign-to",
            "1",
            "--confirm",
            "ELIMINAR",
            "--quiet",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("1 successful, 0 failed"));
}

#[tokio::test]
async fn test_delete_reassign_to_a_target_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args([
            "delete",
            "--ids",
            "7,8",
            "--reassign-to",
            "8",
            "--confirm",
            "DELETE",
            "--quiet",
        ])
        .assert()
        .code(5);
}

#[tokio::test]
async fn test_suspend_without_terminal_requires_yes() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, false)]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1", "--quiet"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, false), (2, false), (3, false)]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["suspend", "--ids", "1,2,3", "--dry-run", "--quiet"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("3 successful, 0 failed (dry run)"));
}

#[test]
fn test_invalid_id_is_a_validation_error() {
    roster_cmd()
        .env("ROSTER_BASE_URL", "http://127.0.0.1:9")
        .args(["suspend", "--ids", "1,abc", "--yes", "--quiet"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("invalid resource id 'abc'"));
}

#[test]
fn test_duplicate_ids_are_rejected_before_sending() {
    roster_cmd()
        .env("ROSTER_BASE_URL", "http://127.0.0.1:9")
        .args(["unsuspend", "--ids", "4,4", "--yes", "--quiet"])
        .assert()
        .code(5);
}

#[tokio::test]
async fn test_bulk_flag_uses_array_endpoint() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(5, true)]).await;
    Mock::given(method("POST"))
        .and(path(api("/users/bulk/suspension")))
        .and(body_json(json!({"ids": [5, 6], "suspended": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "success": true},
            {"id": 6, "success": false, "code": "rest_user_invalid_id", "message": "Invalid user ID."}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["unsuspend", "--ids", "5,6", "--bulk", "--yes", "--quiet"])
        .assert()
        .code(10)
        .stdout(predicate::str::contains("not_found"));
}

#[tokio::test]
async fn test_create_from_file_prints_generated_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/users")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "id": 301,
            "generated_password": "Xy7-generated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("users.json");
    std::fs::write(
        &file,
        r#"[{"username": "dora", "email": "dora@example.com", "roles": ["student"]}]"#,
    )
    .unwrap();

    roster_cmd_for(&server)
        .args(["create", "--file"])
        .arg(&file)
        .args(["--yes", "--quiet"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("id 301, password Xy7-generated"));
}

#[test]
fn test_create_with_malformed_file_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("users.json");
    std::fs::write(&file, r#"{"username": "dora"}"#).unwrap();

    roster_cmd()
        .env("ROSTER_BASE_URL", "http://127.0.0.1:9")
        .args(["create", "--yes", "--quiet", "--file"])
        .arg(&file)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("not a JSON array of user specs"));
}

#[tokio::test]
async fn test_enroll_precondition_escalates_and_exits_10() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("/users/9/enrollments")))
        .and(body_json(json!({"course_id": 101})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("/users/9/enrollments")))
        .and(body_json(json!({"course_id": 102})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "precondition_required": true,
            "order_url": "https://academy.example.com/checkout?course=102"
        })))
        .mount(&server)
        .await;

    roster_cmd_for(&server)
        .args(["enroll", "--user", "9", "--courses", "101,102", "--yes", "--quiet"])
        .assert()
        .code(10)
        .stdout(
            predicate::str::contains("1 item(s) need an order").and(predicate::str::contains(
                "Resolve at: https://academy.example.com/checkout?course=102",
            )),
        );
}

#[tokio::test]
async fn test_metrics_file_records_batch_and_requests() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, &[(1, false), (2, false)]).await;
    mount_suspension(&server, 1, 200, json!({"success": true})).await;
    mount_suspension(
        &server,
        2,
        404,
        json!({"code": "rest_user_invalid_id", "message": "Invalid user ID."}),
    )
    .await;
    let dir = tempfile::tempdir().unwrap();
    let metrics_file = dir.path().join("roster.prom");

    roster_cmd_for(&server)
        .arg("--metrics-file")
        .arg(&metrics_file)
        .args(["suspend", "--ids", "1,2", "--yes", "--quiet"])
        .assert()
        .code(10);

    let body = std::fs::read_to_string(&metrics_file).unwrap();
    assert!(body.contains("roster_batch_runs_total"), "{body}");
    assert!(body.contains("roster_batch_items_total"), "{body}");
    assert!(body.contains("outcome=\"not_found\""), "{body}");
    assert!(body.contains("roster_api_requests_total"), "{body}");
}
