use crate::board::api::{BoardJson, BoardState, CreateBoardRequest, UpdateBoardRequest};
use crate::task::TaskStatus;
use crate::task::api::{CreateTaskRequest, TaskJson, TaskState, UpdateTaskRequest};
use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

/// JSON response for API errors
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. `NOT_FOUND`
    pub error: String,
    pub message: String,
}

/// Error type shared by all JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The addressed task or board, or a referenced board, does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request body or path could not be read or failed validation.
    #[error("{0}")]
    Validation(String),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let message = match &self {
            ApiError::Database(err) => {
                tracing::error!("Database error while handling request: {}", err);
                "An unexpected error occurred while processing your request. Please try again later."
                    .to_string()
            }
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            error: self.error_code().to_string(),
            message,
        };
        (status_code, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// Deserializes a field that is present in the payload, even as `null`, into `Some`.
///
/// Paired with `#[serde(default)]` this gives `Option<Option<T>>` three states:
/// absent (`None`), `null` (`Some(None)`) and a value (`Some(Some(v))`).
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::create_task_handler,
        crate::task::api::get_tasks_handler,
        crate::task::api::get_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
        crate::board::api::create_board_handler,
        crate::board::api::get_boards_handler,
        crate::board::api::get_board_handler,
        crate::board::api::update_board_handler,
        crate::board::api::delete_board_handler,
    ),
    components(schemas(
        ErrorResponse,
        TaskStatus,
        TaskJson,
        CreateTaskRequest,
        UpdateTaskRequest,
        BoardJson,
        CreateBoardRequest,
        UpdateBoardRequest,
    )),
    tags(
        (name = "Tasks", description = "Task tracking"),
        (name = "Boards", description = "Boards grouping tasks")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api-docs/openapi.json.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(task_state: Arc<TaskState>, board_state: Arc<BoardState>) -> Router {
    let task_router = crate::task::api::create_task_router(task_state);
    let board_router = crate::board::api::create_board_router(board_state);
    Router::new()
        .merge(task_router)
        .merge(board_router)
        .route("/api-docs/openapi.json", get(openapi_handler))
}
