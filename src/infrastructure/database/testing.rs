//! In-memory database for tests

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use super::migrator::Migrator;

/// Fresh migrated SQLite database living in a single pooled connection.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite::memory:");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}
