//! Integration tests for the job history and worker status updates.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, delete, get, patch_json, post_json};
use serde_json::{json, Value};

async fn defaults(app: &Router, task: &str) -> Value {
    let json = body_json(get(app, &format!("/api/v1/tasks/{task}/defaults")).await).await;
    json["data"]["params"].clone()
}

async fn queue(app: &Router, prompt: &str) -> Value {
    let mut params = defaults(app, "text-to-video").await;
    params["prompt"] = prompt.into();
    let response = post_json(app, "/api/v1/jobs", params).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn status_uri(job: &Value) -> String {
    format!("/api/v1/jobs/{}/status", job["id"])
}

// ---------------------------------------------------------------------------
// Create / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejects_blocked_configuration() {
    let (app, store) = common::build_test_app();
    let params = defaults(&app, "text-to-video").await;

    let response = post_json(&app, "/api/v1/jobs", params).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn list_is_newest_first_with_rebuilt_commands() {
    let (app, _) = common::build_test_app();
    queue(&app, "first").await;
    queue(&app, "second").await;

    let response = get(&app, "/api/v1/jobs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["version"], 2);

    let jobs = data["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["prompt"], "second");
    assert_eq!(jobs[0]["display"]["status"], "pending");
    assert!(jobs[1]["command"]
        .as_str()
        .unwrap()
        .ends_with("--prompt \"first\""));
}

#[tokio::test]
async fn list_is_not_modified_until_a_new_submission() {
    let (app, _) = common::build_test_app();
    queue(&app, "first").await;

    let response = get(&app, "/api/v1/jobs?since_version=1").await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

    queue(&app, "second").await;
    let response = get(&app, "/api/v1/jobs?since_version=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["jobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_fails_with_503_when_store_is_down() {
    let (app, store) = common::build_test_app();
    store.set_unavailable(true);
    let response = get(&app, "/api/v1/jobs").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, store) = common::build_test_app();
    let job = queue(&app, "a cat").await;
    let uri = format!("/api/v1/jobs/{}", job["id"]);

    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn status_update_after_delete_is_404() {
    let (app, _) = common::build_test_app();
    let job = queue(&app, "a cat").await;
    delete(&app, &format!("/api/v1/jobs/{}", job["id"])).await;

    let response = patch_json(&app, &status_uri(&job), json!({ "status": "running" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Status updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn worker_drives_job_to_completion() {
    let (app, _) = common::build_test_app();
    let job = queue(&app, "a cat").await;

    let response = patch_json(&app, &status_uri(&job), json!({ "status": "running" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["display"]["status"], "running");

    let response = patch_json(
        &app,
        &status_uri(&job),
        json!({ "status": "completed", "output_path": "/out/cat.mp4" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["status"], "completed");
    assert_eq!(data["display"]["output_path"], "/out/cat.mp4");
    assert_eq!(data["summary"], "Output: /out/cat.mp4");
}

#[tokio::test]
async fn pending_job_may_fail_directly() {
    let (app, _) = common::build_test_app();
    let job = queue(&app, "a cat").await;

    let response = patch_json(
        &app,
        &status_uri(&job),
        json!({ "status": "failed", "error_message": "CUDA out of memory" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = &body_json(response).await["data"];
    assert_eq!(data["display"]["error_message"], "CUDA out of memory");
}

#[tokio::test]
async fn terminal_status_is_final() {
    let (app, _) = common::build_test_app();
    let job = queue(&app, "a cat").await;
    patch_json(
        &app,
        &status_uri(&job),
        json!({ "status": "completed", "output_path": "/out/cat.mp4" }),
    )
    .await;

    let response = patch_json(&app, &status_uri(&job), json!({ "status": "running" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let current = body_json(get(&app, &format!("/api/v1/jobs/{}", job["id"])).await).await;
    assert_eq!(current["data"]["status"], "completed");
}

#[tokio::test]
async fn completed_without_output_path_is_400() {
    let (app, _) = common::build_test_app();
    let job = queue(&app, "a cat").await;

    let response = patch_json(&app, &status_uri(&job), json!({ "status": "completed" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json(
        &app,
        &status_uri(&job),
        json!({ "status": "running", "error_message": "stray" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
