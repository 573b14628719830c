use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::entities::{board, task};

/// Opens a connection pool for the given database URL.
///
/// In-memory SQLite databases live and die with a single connection, so the
/// pool is pinned to exactly one connection for those URLs.
#[tracing::instrument]
pub async fn connect(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_url);
    if db_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

/// Creates the `board` and `task` tables and their indexes when they are absent.
///
/// Safe to run on every start: existing tables and indexes are left untouched.
#[tracing::instrument(skip(db))]
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // board first, task holds the foreign key
    let mut create_board = schema.create_table_from_entity(board::Entity);
    create_board.if_not_exists();
    db.execute(backend.build(&create_board)).await?;

    let mut create_task = schema.create_table_from_entity(task::Entity);
    create_task.if_not_exists();
    db.execute(backend.build(&create_task)).await?;

    let indexes = schema
        .create_index_from_entity(board::Entity)
        .into_iter()
        .chain(schema.create_index_from_entity(task::Entity));
    for mut index in indexes {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    tracing::info!("Database schema is ready");
    Ok(())
}
