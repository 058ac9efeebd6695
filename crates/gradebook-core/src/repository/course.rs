//! Course catalogue and teaching class repository trait definition.

use gradebook_types::academic::{Course, TeachingClass};
use gradebook_types::error::RepositoryError;

/// Repository trait for courses and the teaching classes offered for them.
pub trait CourseRepository: Send + Sync {
    fn create_course(
        &self,
        course: &Course,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_course(
        &self,
        cid: &str,
    ) -> impl std::future::Future<Output = Result<Option<Course>, RepositoryError>> + Send;

    fn list_courses(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Course>, RepositoryError>> + Send;

    /// Insert a teaching class. The course and teacher must already exist.
    fn create_class(
        &self,
        class: &TeachingClass,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_class(
        &self,
        tcid: &str,
    ) -> impl std::future::Future<Output = Result<Option<TeachingClass>, RepositoryError>> + Send;

    /// List every teaching class, ordered by tcid.
    fn list_classes(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TeachingClass>, RepositoryError>> + Send;
}
