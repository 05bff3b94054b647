//! Connection pooling and migrations.

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::errors::StorageError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Creates a connection pool for the database at `db_path` and brings
/// the schema up to date.
pub fn create_pool(db_path: &str) -> Result<DbPool, StorageError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(StorageError::from)?;

    run_migrations(&pool)?;
    info!("Database ready at {}", db_path);

    Ok(pool)
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, StorageError> {
    pool.get().map_err(StorageError::from)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    let mut conn = get_connection(pool)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
    Ok(())
}
