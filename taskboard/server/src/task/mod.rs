use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub use crate::entities::sea_orm_active_enums::TaskStatus;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: i32,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    board_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: i32,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        board_id: Option<i32>,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            board_id,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the ID of the board this task is assigned to, if any.
    pub fn board_id(&self) -> Option<i32> {
        self.board_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last updated, or `None` if it never was.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(
            model.id,
            model.title,
            model.description,
            model.status,
            model.board_id,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub board_id: Option<i32>,
}

/// A partial update to a task.
///
/// `None` leaves a field as it is. For the nullable fields, `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub board_id: Option<Option<i32>>,
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The task does not exist.
    #[error("Task with ID {0} not found")]
    TaskNotFound(i32),
    /// The board a task was to be assigned to does not exist.
    #[error("Board with ID {0} not found")]
    BoardNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The fields of the task. A `board_id` must name an existing board.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task`, or `BoardNotFound` if the board is missing.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        if let Some(board_id) = new_task.board_id {
            self.ensure_board_exists(board_id).await?;
        }

        let active_model = task::ActiveModel {
            title: ActiveValue::Set(new_task.title),
            description: ActiveValue::Set(new_task.description),
            status: ActiveValue::Set(new_task.status),
            board_id: ActiveValue::Set(new_task.board_id),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(None),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    /// Retrieves all tasks, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task`, or `TaskNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: i32) -> Result<Task, TaskServiceError> {
        let task_model = self.find_task_model(id).await?;
        Ok(Task::from(task_model))
    }

    /// Applies a partial update to a task.
    ///
    /// `updated_at` is stamped on every successful call, even when `changes`
    /// is empty. Nothing is written if the task or the requested board is missing.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `changes` - The fields to change.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task`, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: i32,
        changes: TaskChanges,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_task_model(id).await?;
        if let Some(Some(board_id)) = changes.board_id {
            self.ensure_board_exists(board_id).await?;
        }

        let mut active_model: task::ActiveModel = task_to_update.into();
        if let Some(title) = changes.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(status) = changes.status {
            active_model.status = ActiveValue::Set(status);
        }
        if let Some(board_id) = changes.board_id {
            active_model.board_id = ActiveValue::Set(board_id);
        }
        active_model.updated_at = ActiveValue::Set(Some(Utc::now()));

        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task`, or `TaskNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: i32) -> Result<Task, TaskServiceError> {
        let task_to_delete = self.find_task_model(id).await?;
        let task_copy = Task::from(task_to_delete.clone());
        task_to_delete.delete(self.db).await?;
        Ok(task_copy)
    }

    async fn find_task_model(&self, id: i32) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn ensure_board_exists(&self, board_id: i32) -> Result<(), TaskServiceError> {
        let existing_board = board::Entity::find_by_id(board_id)
            .one(self.db)
            .await?;
        match existing_board {
            Some(_) => Ok(()),
            None => Err(TaskServiceError::BoardNotFound(board_id)),
        }
    }
}
