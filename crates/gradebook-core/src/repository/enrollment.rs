//! Enrolment repository trait definition.

use gradebook_types::error::RepositoryError;

/// Repository trait for student enrolments in teaching classes.
///
/// An enrolment is a unique `(sid, tcid)` pair.
pub trait EnrollmentRepository: Send + Sync {
    /// Enrol a student. Returns `Conflict` if the pair already exists.
    fn enroll(
        &self,
        sid: &str,
        tcid: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Teaching class ids the student is enrolled in, ordered by tcid.
    fn classes_of_student(
        &self,
        sid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Student ids enrolled in a teaching class, ordered by sid.
    fn students_of_class(
        &self,
        tcid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
