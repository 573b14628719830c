use crate::board::{Board, BoardChanges, BoardService, BoardServiceError};
use crate::task::Task;
use crate::task::api::TaskJson;
use crate::web::api::{ApiError, ErrorResponse, deserialize_some};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// JSON representation of a Board for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BoardJson {
    /// Unique identifier for the board
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Tasks assigned to the board, present on read responses only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskJson>>,
}

impl From<Board> for BoardJson {
    fn from(board: Board) -> Self {
        Self {
            id: board.id(),
            name: board.name().to_string(),
            description: board.description().map(str::to_string),
            tasks: None,
        }
    }
}

impl From<(Board, Vec<Task>)> for BoardJson {
    fn from((board, tasks): (Board, Vec<Task>)) -> Self {
        Self {
            tasks: Some(tasks.into_iter().map(TaskJson::from).collect()),
            ..BoardJson::from(board)
        }
    }
}

/// Request body for POST /boards/.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: String,
    description: Option<String>,
}

/// Request body for PUT /boards/{id}. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBoardRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    name: Option<String>,
    /// `null` clears the description
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    description: Option<Option<String>>,
}

impl From<UpdateBoardRequest> for BoardChanges {
    fn from(request: UpdateBoardRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
        }
    }
}

impl From<BoardServiceError> for ApiError {
    fn from(err: BoardServiceError) -> Self {
        match err {
            BoardServiceError::BoardNotFound(_) => ApiError::NotFound(err.to_string()),
            BoardServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BoardState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Handler for POST /boards/ - Creates a board.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/boards/",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created", body = BoardJson),
        (status = 422, description = "Invalid board", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn create_board_handler(
    State(state): State<Arc<BoardState>>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateBoardRequest>, ApiError>,
) -> Result<(StatusCode, Json<BoardJson>), ApiError> {
    payload.validate()?;
    let service = BoardService::new(&state.db);
    let board = service
        .create_board(payload.name, payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(BoardJson::from(board))))
}

/// Handler for GET /boards/ - Returns all boards with their tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/boards/",
    responses(
        (status = 200, description = "Successfully retrieved boards", body = [BoardJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn get_boards_handler(
    State(state): State<Arc<BoardState>>,
) -> Result<Json<Vec<BoardJson>>, ApiError> {
    let service = BoardService::new(&state.db);
    let boards = service.get_all_boards_with_tasks().await?;
    Ok(Json(boards.into_iter().map(BoardJson::from).collect()))
}

/// Handler for GET /boards/{id} - Returns the board with its tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/boards/{id}",
    params(("id" = i32, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Board found", body = BoardJson),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn get_board_handler(
    State(state): State<Arc<BoardState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<BoardJson>, ApiError> {
    let service = BoardService::new(&state.db);
    let board_with_tasks = service.get_board_with_tasks(id).await?;
    Ok(Json(BoardJson::from(board_with_tasks)))
}

/// Handler for PUT /boards/{id} - Partially updates a board.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/boards/{id}",
    params(("id" = i32, Path, description = "Board ID")),
    request_body = UpdateBoardRequest,
    responses(
        (status = 200, description = "Board updated", body = BoardJson),
        (status = 404, description = "Board not found", body = ErrorResponse),
        (status = 422, description = "Invalid update", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn update_board_handler(
    State(state): State<Arc<BoardState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateBoardRequest>, ApiError>,
) -> Result<Json<BoardJson>, ApiError> {
    payload.validate()?;
    let service = BoardService::new(&state.db);
    let board = service.update_board(id, payload.into()).await?;
    Ok(Json(BoardJson::from(board)))
}

/// Handler for DELETE /boards/{id} - Returns the deleted board.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/boards/{id}",
    params(("id" = i32, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Board deleted", body = BoardJson),
        (status = 404, description = "Board not found", body = ErrorResponse)
    ),
    tag = "Boards"
)]
pub async fn delete_board_handler(
    State(state): State<Arc<BoardState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<BoardJson>, ApiError> {
    let service = BoardService::new(&state.db);
    let board = service.delete_board_by_id(id).await?;
    Ok(Json(BoardJson::from(board)))
}

/// Creates and returns the boards router.
pub fn create_board_router(state: Arc<BoardState>) -> Router {
    Router::new()
        .route("/boards", get(get_boards_handler).post(create_board_handler))
        .route("/boards/", get(get_boards_handler).post(create_board_handler))
        .route(
            "/boards/{id}",
            get(get_board_handler)
                .put(update_board_handler)
                .delete(delete_board_handler),
        )
        .with_state(state)
}
