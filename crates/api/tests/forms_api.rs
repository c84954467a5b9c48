//! Integration tests for form sessions: live command, gate, and submit.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post, post_json};
use serde_json::{json, Value};

async fn open(app: &axum::Router, task: &str) -> (String, Value) {
    let response = post_json(app, "/api/v1/forms", json!({ "task": task })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    (data["id"].as_str().unwrap().to_string(), data)
}

// ---------------------------------------------------------------------------
// Open / update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_form_shows_defaults_and_blocked_gate() {
    let (app, _) = common::build_test_app();
    let (_, form) = open(&app, "text-to-video").await;

    assert_eq!(form["task"], "text-to-video");
    assert_eq!(form["params"]["checkpoint_dir"], "./Wan2.2-T2V-A14B");
    assert_eq!(form["readiness"]["state"], "blocked");
    assert_eq!(form["readiness"]["missing"], json!(["prompt"]));
    assert!(!form["command"].as_str().unwrap().contains("--prompt"));
}

#[tokio::test]
async fn patch_recompiles_command() {
    let (app, _) = common::build_test_app();
    let (id, _) = open(&app, "text-to-video").await;

    let response = patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({
            "base": { "seed": 42, "prompt_expansion": true },
            "variant": { "task": "text-to-video", "prompt": "a cat" }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let form = &body_json(response).await["data"];
    let command = form["command"].as_str().unwrap();
    assert!(command.contains("--base_seed 42"));
    assert!(command.contains("--use_prompt_extend"));
    assert!(command.contains("--prompt_extend_method remote-api"));
    assert!(command.ends_with("--prompt \"a cat\""));
    assert_eq!(form["readiness"]["state"], "ready");
}

#[tokio::test]
async fn patch_for_another_variant_is_rejected() {
    let (app, _) = common::build_test_app();
    let (id, _) = open(&app, "animate").await;

    let response = patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({ "variant": { "task": "text-to-video", "prompt": "a cat" } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_with_unknown_field_is_rejected() {
    let (app, _) = common::build_test_app();
    let (id, _) = open(&app, "text-to-video").await;

    let response = patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({ "base": { "sampler": "dpm++" } }),
    )
    .await;
    assert!(response.status().is_client_error());

    let form = body_json(get(&app, &format!("/api/v1/forms/{id}")).await).await;
    assert_eq!(form["data"]["params"]["solver"], "unipc");
}

#[tokio::test]
async fn unknown_form_is_404_and_close_is_idempotent() {
    let (app, _) = common::build_test_app();
    let missing = "00000000-0000-0000-0000-000000000000";
    let response = get(&app, &format!("/api/v1/forms/{missing}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (id, _) = open(&app, "animate").await;
    let uri = format!("/api/v1/forms/{id}");
    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete(&app, &uri).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_form_cannot_submit() {
    let (app, store) = common::build_test_app();
    let (id, _) = open(&app, "text-and-image-to-video").await;

    let response = post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("image_path"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn submit_queues_pending_job_and_keeps_form() {
    let (app, store) = common::build_test_app();
    let (id, _) = open(&app, "image-to-video").await;
    patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({ "variant": { "task": "image-to-video", "image_path": "/img/cat.png" } }),
    )
    .await;

    let response = post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let job = &body_json(response).await["data"];
    assert_eq!(job["status"], "pending");
    assert_eq!(job["task"], "image-to-video");
    assert_eq!(job["prompt"], "/img/cat.png");
    assert!(job["command"]
        .as_str()
        .unwrap()
        .contains("--image \"/img/cat.png\""));
    assert_eq!(store.len().await, 1);

    // The form stays open with its configuration.
    let form = body_json(get(&app, &format!("/api/v1/forms/{id}")).await).await;
    assert_eq!(form["data"]["params"]["image_path"], "/img/cat.png");
    assert_eq!(form["data"]["readiness"]["state"], "ready");
}

#[tokio::test]
async fn submit_with_store_down_is_503_and_form_can_retry() {
    let (app, store) = common::build_test_app();
    let (id, _) = open(&app, "animate").await;
    patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({ "variant": { "task": "animate", "source_data_path": "/data/run1" } }),
    )
    .await;

    store.set_unavailable(true);
    let response = post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "STORE_UNAVAILABLE");

    store.set_unavailable(false);
    let response = post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn out_of_range_value_blocks_submit() {
    let (app, store) = common::build_test_app();
    let (id, _) = open(&app, "text-to-video").await;
    patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({
            "base": { "frame_count": 80 },
            "variant": { "task": "text-to-video", "prompt": "a cat" }
        }),
    )
    .await;

    let response = post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn submit_bumps_queue_version() {
    let (app, _) = common::build_test_app();
    let (id, _) = open(&app, "text-to-video").await;
    patch_json(
        &app,
        &format!("/api/v1/forms/{id}"),
        json!({ "variant": { "task": "text-to-video", "prompt": "a cat" } }),
    )
    .await;

    post(&app, &format!("/api/v1/forms/{id}/submit")).await;
    post(&app, &format!("/api/v1/forms/{id}/submit")).await;

    let health = body_json(get(&app, "/health").await).await;
    assert_eq!(health["queue_version"], 2);
}
