//! SQLite grade repository implementation.
//!
//! One row per `(sid, cid)`; each component is its own nullable REAL column
//! so grade tables can be queried and sorted in SQL if needed.

use chrono::{DateTime, Utc};
use gradebook_core::repository::grade::GradeRepository;
use gradebook_types::error::RepositoryError;
use gradebook_types::grade::{GradeRecord, ScoreSheet};
use sqlx::Row;
use uuid::Uuid;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `GradeRepository`.
pub struct SqliteGradeRepository {
    pool: DatabasePool,
}

impl SqliteGradeRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct GradeRow {
    gid: String,
    sid: String,
    cid: String,
    usual_score: Option<f64>,
    mid_score: Option<f64>,
    exp_score: Option<f64>,
    final_score: Option<f64>,
    total_score: f64,
    updated_at: String,
}

impl GradeRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            gid: row.try_get("gid")?,
            sid: row.try_get("sid")?,
            cid: row.try_get("cid")?,
            usual_score: row.try_get("usual_score")?,
            mid_score: row.try_get("mid_score")?,
            exp_score: row.try_get("exp_score")?,
            final_score: row.try_get("final_score")?,
            total_score: row.try_get("total_score")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_record(self) -> Result<GradeRecord, RepositoryError> {
        let gid = Uuid::parse_str(&self.gid)
            .map_err(|e| RepositoryError::Query(format!("invalid gid: {e}")))?;
        Ok(GradeRecord {
            gid,
            sid: self.sid,
            cid: self.cid,
            scores: ScoreSheet {
                usual: self.usual_score,
                midterm: self.mid_score,
                lab: self.exp_score,
                final_exam: self.final_score,
            },
            total: self.total_score,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn map_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<GradeRecord>, RepositoryError> {
    rows.iter()
        .map(|row| {
            GradeRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_record()
        })
        .collect()
}

const SELECT_GRADE: &str = "SELECT gid, sid, cid, usual_score, mid_score, exp_score, final_score, \
     total_score, updated_at FROM grades";

impl GradeRepository for SqliteGradeRepository {
    async fn get(&self, sid: &str, cid: &str) -> Result<Option<GradeRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_GRADE} WHERE sid = ? AND cid = ?"))
            .bind(sid)
            .bind(cid)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        Ok(map_rows(&rows)?.into_iter().next())
    }

    async fn list_for_student(&self, sid: &str) -> Result<Vec<GradeRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_GRADE} WHERE sid = ? ORDER BY cid"))
            .bind(sid)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        map_rows(&rows)
    }

    async fn merge_scores(
        &self,
        sid: &str,
        cid: &str,
        scores: &ScoreSheet,
        updated_at: DateTime<Utc>,
    ) -> Result<GradeRecord, RepositoryError> {
        // The writer pool has a single connection, so holding the transaction
        // serializes every merge against every other write.
        let mut tx = self.pool.writer.begin().await.map_err(map_sqlx_error)?;

        let existing = sqlx::query(&format!("{SELECT_GRADE} WHERE sid = ? AND cid = ?"))
            .bind(sid)
            .bind(cid)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        let (gid, merged) = match existing {
            Some(row) => {
                let stored = GradeRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_record()?;
                (stored.gid, scores.or_existing(&stored.scores))
            }
            None => (Uuid::now_v7(), *scores),
        };

        let record = GradeRecord {
            gid,
            sid: sid.to_string(),
            cid: cid.to_string(),
            scores: merged,
            total: merged.total(),
            updated_at,
        };
        sqlx::query(
            r#"INSERT INTO grades (gid, sid, cid, usual_score, mid_score, exp_score, final_score, total_score, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (sid, cid) DO UPDATE SET
                   usual_score = excluded.usual_score,
                   mid_score = excluded.mid_score,
                   exp_score = excluded.exp_score,
                   final_score = excluded.final_score,
                   total_score = excluded.total_score,
                   updated_at = excluded.updated_at"#,
        )
        .bind(record.gid.to_string())
        .bind(&record.sid)
        .bind(&record.cid)
        .bind(record.scores.usual)
        .bind(record.scores.midterm)
        .bind(record.scores.lab)
        .bind(record.scores.final_exam)
        .bind(record.total)
        .bind(record.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(record)
    }
}
