//! SQLite enrolment repository implementation.

use gradebook_core::repository::enrollment::EnrollmentRepository;
use gradebook_types::error::RepositoryError;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `EnrollmentRepository`.
pub struct SqliteEnrollmentRepository {
    pool: DatabasePool,
}

impl SqliteEnrollmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl EnrollmentRepository for SqliteEnrollmentRepository {
    async fn enroll(&self, sid: &str, tcid: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO enrollments (sid, tcid) VALUES (?, ?)")
            .bind(sid)
            .bind(tcid)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn classes_of_student(&self, sid: &str) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT tcid FROM enrollments WHERE sid = ? ORDER BY tcid")
                .bind(sid)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|(tcid,)| tcid).collect())
    }

    async fn students_of_class(&self, tcid: &str) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT sid FROM enrollments WHERE tcid = ? ORDER BY sid")
                .bind(tcid)
                .fetch_all(&self.pool.reader)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|(sid,)| sid).collect())
    }
}
