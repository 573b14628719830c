//! Acceptance sequence every build of the service must pass.
//!
//! The steps share one store and run in order: later steps rely on the task
//! and board with ID 1 created by earlier ones.

use axum::Router;
use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

use common::send_json;

async fn create_task(app: &Router) {
    let (status, data) = send_json(
        app,
        Method::POST,
        "/tasks/",
        Some(json!({
            "title": "Test Task",
            "description": "Test Description",
            "status": "not_started"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["title"], "Test Task");
    assert_eq!(data["description"], "Test Description");
    assert_eq!(data["status"], "not_started");
    assert!(data.get("id").is_some());
}

async fn read_tasks(app: &Router) {
    let (status, tasks) = send_json(app, Method::GET, "/tasks/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!tasks.as_array().unwrap().is_empty());
}

async fn read_task(app: &Router) {
    let (status, task) = send_json(app, Method::GET, "/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["id"], 1);
}

async fn update_task(app: &Router) {
    let (status, updated_task) = send_json(
        app,
        Method::PUT,
        "/tasks/1",
        Some(json!({
            "title": "Updated Task",
            "description": "Updated Description",
            "status": "in_progress"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated_task["title"], "Updated Task");
    assert_eq!(updated_task["description"], "Updated Description");
    assert_eq!(updated_task["status"], "in_progress");
}

async fn delete_task(app: &Router) {
    let (status, task_to_delete) = send_json(
        app,
        Method::POST,
        "/tasks/",
        Some(json!({
            "title": "Task to Delete",
            "description": "To be deleted",
            "status": "not_started"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_uri = format!("/tasks/{}", task_to_delete["id"]);

    let (status, deleted_task) = send_json(app, Method::DELETE, &task_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted_task["id"], task_to_delete["id"]);

    let (status, _) = send_json(app, Method::GET, &task_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn task_not_found(app: &Router) {
    let (status, _) = send_json(app, Method::GET, "/tasks/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_board(app: &Router) {
    let (status, data) = send_json(
        app,
        Method::POST,
        "/boards/",
        Some(json!({"name": "Test Board", "description": "Test Board Description"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(data["name"], "Test Board");
    assert_eq!(data["description"], "Test Board Description");
    assert!(data.get("id").is_some());
}

async fn read_boards(app: &Router) {
    let (status, boards) = send_json(app, Method::GET, "/boards/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!boards.as_array().unwrap().is_empty());
}

async fn read_board(app: &Router) {
    let (status, board) = send_json(app, Method::GET, "/boards/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["id"], 1);
}

async fn update_board(app: &Router) {
    let (status, updated_board) = send_json(
        app,
        Method::PUT,
        "/boards/1",
        Some(json!({"name": "Updated Board", "description": "Updated Board Description"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated_board["name"], "Updated Board");
    assert_eq!(updated_board["description"], "Updated Board Description");
}

async fn delete_board(app: &Router) {
    let (status, board_to_delete) = send_json(
        app,
        Method::POST,
        "/boards/",
        Some(json!({"name": "Board to Delete", "description": "To be deleted"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let board_uri = format!("/boards/{}", board_to_delete["id"]);

    let (status, deleted_board) = send_json(app, Method::DELETE, &board_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted_board["id"], board_to_delete["id"]);

    let (status, _) = send_json(app, Method::GET, &board_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn board_not_found(app: &Router) {
    let (status, _) = send_json(app, Method::GET, "/boards/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn create_task_with_invalid_data(app: &Router) {
    let (status, _) = send_json(app, Method::POST, "/tasks/", Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

async fn update_task_with_invalid_data(app: &Router) {
    let (status, _) = send_json(
        app,
        Method::PUT,
        "/tasks/1",
        Some(json!({"status": "invalid_status"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

async fn create_board_with_invalid_data(app: &Router) {
    let (status, _) = send_json(app, Method::POST, "/boards/", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

async fn update_board_with_invalid_data(app: &Router) {
    let (status, _) = send_json(app, Method::PUT, "/boards/1", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

/// Runs every step, in order, against one application instance.
async fn run_conformance_suite(app: &Router) {
    create_task(app).await;
    read_tasks(app).await;
    read_task(app).await;
    update_task(app).await;
    delete_task(app).await;
    task_not_found(app).await;
    create_board(app).await;
    read_boards(app).await;
    read_board(app).await;
    update_board(app).await;
    delete_board(app).await;
    board_not_found(app).await;
    create_task_with_invalid_data(app).await;
    update_task_with_invalid_data(app).await;
    create_board_with_invalid_data(app).await;
    update_board_with_invalid_data(app).await;
}

#[tokio::test]
async fn can_pass_conformance_suite_on_fresh_store() {
    let (app, _db) = common::setup_app()
        .await
        .expect("Failed to setup test app");

    run_conformance_suite(&app).await;
}

#[tokio::test]
async fn can_pass_conformance_suite_after_repeated_schema_setup() {
    let (app, db) = common::setup_app()
        .await
        .expect("Failed to setup test app");
    taskboard_server::db::ensure_schema(&db)
        .await
        .expect("Schema setup should be idempotent");

    run_conformance_suite(&app).await;
}
