use crate::entities::*;
use crate::task::Task;
use sea_orm::sea_query::Expr;
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Board {
    id: i32,
    name: String,
    description: Option<String>,
}

impl Board {
    pub fn new(id: i32, name: String, description: Option<String>) -> Self {
        Self {
            id,
            name,
            description,
        }
    }

    /// Returns the ID of the board.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the name of the board.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description of the board.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<board::Model> for Board {
    fn from(model: board::Model) -> Self {
        Board::new(model.id, model.name, model.description)
    }
}

/// A partial update to a board. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Error type for BoardService operations.
#[derive(Debug, thiserror::Error)]
pub enum BoardServiceError {
    /// Represents a board not found error.
    #[error("Board with ID {0} not found")]
    BoardNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct BoardService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl BoardService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> BoardService<'_> {
        BoardService { db }
    }

    /// Creates a new board in the database.
    /// # Arguments
    ///
    /// * `name` - The name of the board.
    /// * `description` - An optional description.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Board` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_board(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Board, BoardServiceError> {
        let active_model = board::ActiveModel {
            name: ActiveValue::Set(name),
            description: ActiveValue::Set(description),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Board::from(created_model))
    }

    /// Retrieves all boards together with their tasks.
    ///
    /// Boards and the tasks of each board are ordered by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_boards_with_tasks(
        &self,
    ) -> Result<Vec<(Board, Vec<Task>)>, BoardServiceError> {
        let boards = board::Entity::find()
            .find_with_related(task::Entity)
            .order_by_asc(board::Column::Id)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(|(board_model, task_models)| {
                let tasks = task_models.into_iter().map(Task::from).collect();
                (Board::from(board_model), tasks)
            })
            .collect();
        Ok(boards)
    }

    /// Retrieves a board by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Board` if successful, or `BoardNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get_board_by_id(&self, id: i32) -> Result<Board, BoardServiceError> {
        let board_model = self.find_board_model(id).await?;
        Ok(Board::from(board_model))
    }

    /// Retrieves a board by its ID along with the tasks assigned to it.
    #[tracing::instrument(skip(self))]
    pub async fn get_board_with_tasks(
        &self,
        id: i32,
    ) -> Result<(Board, Vec<Task>), BoardServiceError> {
        let board_model = self.find_board_model(id).await?;
        let tasks = board_model
            .find_related(task::Entity)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok((Board::from(board_model), tasks))
    }

    /// Applies a partial update to a board.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the board to update.
    /// * `changes` - The fields to change.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Board` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_board(
        &self,
        id: i32,
        changes: BoardChanges,
    ) -> Result<Board, BoardServiceError> {
        let board_to_update = self.find_board_model(id).await?;

        if changes == BoardChanges::default() {
            return Ok(Board::from(board_to_update));
        }

        let mut active_model: board::ActiveModel = board_to_update.into();
        if let Some(name) = changes.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }

        let updated_model = active_model.update(self.db).await?;
        Ok(Board::from(updated_model))
    }

    /// Deletes a board by its ID.
    ///
    /// Tasks assigned to the board are unassigned in the same transaction.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Board` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_board_by_id(&self, id: i32) -> Result<Board, BoardServiceError> {
        let board_to_delete = self.find_board_model(id).await?;
        let board_copy = Board::from(board_to_delete.clone());

        let txn = self.db.begin().await?;
        let unassigned = task::Entity::update_many()
            .col_expr(task::Column::BoardId, Expr::value(Option::<i32>::None))
            .filter(task::Column::BoardId.eq(id))
            .exec(&txn)
            .await?;
        board_to_delete.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            "Deleted board {} and unassigned {} task(s)",
            id,
            unassigned.rows_affected
        );
        Ok(board_copy)
    }

    async fn find_board_model(&self, id: i32) -> Result<board::Model, BoardServiceError> {
        board::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(BoardServiceError::BoardNotFound(id))
    }
}
