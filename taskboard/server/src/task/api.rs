use crate::task::{NewTask, Task, TaskChanges, TaskService, TaskServiceError, TaskStatus};
use crate::web::api::{ApiError, ErrorResponse, deserialize_some};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// JSON representation of a Task for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// Board the task is assigned to
    pub board_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// Time of the last update, null until the task is first updated
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            status: task.status(),
            board_id: task.board_id(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request body for POST /tasks/.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: String,
    description: Option<String>,
    status: TaskStatus,
    /// Board to assign the task to; must exist
    board_id: Option<i32>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            status: request.status,
            board_id: request.board_id,
        }
    }
}

/// Request body for PUT /tasks/{id}. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    title: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    description: Option<Option<String>>,
    status: Option<TaskStatus>,
    /// `null` removes the task from its board
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    board_id: Option<Option<i32>>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            status: request.status,
            board_id: request.board_id,
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(_) | TaskServiceError::BoardNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            TaskServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Handler for POST /tasks/ - Creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/tasks/",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 404, description = "Board not found", body = ErrorResponse),
        (status = 422, description = "Invalid task", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateTaskRequest>, ApiError>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError> {
    payload.validate()?;
    let service = TaskService::new(&state.db);
    let task = service.create_task(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for GET /tasks/ - Returns all tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /tasks/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<TaskJson>, ApiError> {
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /tasks/{id} - Partially updates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 404, description = "Task or board not found", body = ErrorResponse),
        (status = 422, description = "Invalid update", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateTaskRequest>, ApiError>,
) -> Result<Json<TaskJson>, ApiError> {
    payload.validate()?;
    let service = TaskService::new(&state.db);
    let task = service.update_task(id, payload.into()).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /tasks/{id} - Returns the deleted task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<TaskJson>, ApiError> {
    let service = TaskService::new(&state.db);
    let task = service.delete_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Creates and returns the tasks router.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler).post(create_task_handler))
        .route("/tasks/", get(get_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_tell_missing_board_id_from_null_board_id() {
        let omitted: UpdateTaskRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        let cleared: UpdateTaskRequest = serde_json::from_str(r#"{"board_id": null}"#).unwrap();
        let assigned: UpdateTaskRequest = serde_json::from_str(r#"{"board_id": 3}"#).unwrap();

        assert_eq!(TaskChanges::from(omitted).board_id, None);
        assert_eq!(TaskChanges::from(cleared).board_id, Some(None));
        assert_eq!(TaskChanges::from(assigned).board_id, Some(Some(3)));
    }

    #[test]
    fn can_reject_empty_title_on_update() {
        let request: UpdateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn can_reject_unknown_status() {
        let result = serde_json::from_str::<CreateTaskRequest>(
            r#"{"title": "Task", "status": "invalid_status"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn can_require_status_on_create() {
        let result = serde_json::from_str::<CreateTaskRequest>(r#"{"title": "Task"}"#);
        assert!(result.is_err());
    }
}
