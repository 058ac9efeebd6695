//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod account;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod pool;

use gradebook_types::error::RepositoryError;

/// Map a sqlx error to a repository error, turning constraint violations into
/// `Conflict`.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!("missing reference: {}", db.message()));
        }
    }
    RepositoryError::Query(err.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::pool::DatabasePool;

    /// Fresh migrated database in a temp dir. Keep the `TempDir` alive for the
    /// duration of the test.
    pub async fn test_pool() -> (DatabasePool, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (pool, dir)
    }
}
