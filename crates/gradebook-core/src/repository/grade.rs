//! Grade repository trait definition.

use chrono::{DateTime, Utc};
use gradebook_types::error::RepositoryError;
use gradebook_types::grade::{GradeRecord, ScoreSheet};

/// Repository trait for grade records, one per `(sid, cid)`.
pub trait GradeRepository: Send + Sync {
    /// Get the grade of a student in a course.
    fn get(
        &self,
        sid: &str,
        cid: &str,
    ) -> impl std::future::Future<Output = Result<Option<GradeRecord>, RepositoryError>> + Send;

    /// Every grade of a student, ordered by course id.
    fn list_for_student(
        &self,
        sid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<GradeRecord>, RepositoryError>> + Send;

    /// Merge `scores` into the grade for `(sid, cid)` and return the stored record.
    ///
    /// Components absent from `scores` keep their stored value and the total is
    /// recomputed from the merged sheet. The read and the write are one atomic
    /// step, so concurrent merges into the same grade never drop each other's
    /// components. A new grade gets a fresh gid.
    fn merge_scores(
        &self,
        sid: &str,
        cid: &str,
        scores: &ScoreSheet,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<GradeRecord, RepositoryError>> + Send;
}
