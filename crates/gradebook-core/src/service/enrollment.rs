//! Course selection for students.
//!
//! A student picks teaching classes, at most one per course, since grades are
//! recorded per course.

use std::collections::HashSet;
use std::sync::Arc;

use gradebook_types::academic::{ClassListing, TeachingClass};
use gradebook_types::error::RepositoryError;
use gradebook_types::outcome::Outcome;

use crate::repository::account::AccountRepository;
use crate::repository::course::CourseRepository;
use crate::repository::enrollment::EnrollmentRepository;

pub struct EnrollmentService<A, C, E> {
    accounts: Arc<A>,
    courses: Arc<C>,
    enrollments: Arc<E>,
}

impl<A, C, E> EnrollmentService<A, C, E>
where
    A: AccountRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub fn new(accounts: Arc<A>, courses: Arc<C>, enrollments: Arc<E>) -> Self {
        Self {
            accounts,
            courses,
            enrollments,
        }
    }

    /// Classes the student has selected.
    pub async fn selected_classes(&self, sid: &str) -> Result<Vec<ClassListing>, RepositoryError> {
        let mut listings = Vec::new();
        for tcid in self.enrollments.classes_of_student(sid).await? {
            if let Some(class) = self.courses.get_class(&tcid).await? {
                listings.push(self.listing(&class).await?);
            }
        }
        Ok(listings)
    }

    /// Classes the student may still select: not selected, and not of a course
    /// the student already takes through another class.
    pub async fn available_classes(&self, sid: &str) -> Result<Vec<ClassListing>, RepositoryError> {
        let selected = self.enrollments.classes_of_student(sid).await?;
        let classes = self.courses.list_classes().await?;

        let taken_courses: HashSet<&str> = classes
            .iter()
            .filter(|c| selected.contains(&c.tcid))
            .map(|c| c.cid.as_str())
            .collect();

        let mut listings = Vec::new();
        for class in classes.iter().filter(|c| !taken_courses.contains(c.cid.as_str())) {
            listings.push(self.listing(class).await?);
        }
        Ok(listings)
    }

    /// Enrol the student in `tcid`.
    pub async fn select(&self, sid: &str, tcid: &str) -> Result<Outcome, RepositoryError> {
        let Some(class) = self.courses.get_class(tcid).await? else {
            return Ok(Outcome::failure(format!(
                "teaching class '{tcid}' does not exist"
            )));
        };

        for selected in self.enrollments.classes_of_student(sid).await? {
            if selected == tcid {
                return Ok(Outcome::failure(format!("'{}' is already selected", class.name)));
            }
            if let Some(other) = self.courses.get_class(&selected).await? {
                if other.cid == class.cid {
                    return Ok(Outcome::failure(format!(
                        "already taking course '{}' in class '{}'",
                        class.cid, other.name
                    )));
                }
            }
        }

        match self.enrollments.enroll(sid, tcid).await {
            Ok(()) => {
                tracing::info!(sid, tcid, "course selected");
                Ok(Outcome::success(format!("selected '{}'", class.name)))
            }
            Err(RepositoryError::Conflict(_)) => {
                Ok(Outcome::failure(format!("'{}' is already selected", class.name)))
            }
            Err(e) => Err(e),
        }
    }

    async fn listing(&self, class: &TeachingClass) -> Result<ClassListing, RepositoryError> {
        let course_name = self
            .courses
            .get_course(&class.cid)
            .await?
            .map(|c| c.name)
            .unwrap_or_else(|| class.cid.clone());
        let teacher_name = self
            .accounts
            .get(&class.tid)
            .await?
            .map(|a| a.name)
            .unwrap_or_else(|| class.tid.clone());

        Ok(ClassListing {
            tcid: class.tcid.clone(),
            course_name,
            class_name: class.name.clone(),
            teacher_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testing::fixture;

    #[tokio::test]
    async fn test_selected_classes_join_names() {
        let gradebook = fixture().await;
        let selected = gradebook.enrollment().selected_classes("s1").await.unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].tcid, "tc1");
        assert_eq!(selected[0].course_name, "Calculus");
        assert_eq!(selected[0].teacher_name, "Teacher One");
    }

    #[tokio::test]
    async fn test_available_excludes_courses_already_taken() {
        let gradebook = fixture().await;
        let available = gradebook.enrollment().available_classes("s1").await.unwrap();
        let tcids: Vec<&str> = available.iter().map(|l| l.tcid.as_str()).collect();
        assert_eq!(tcids, vec!["tc3"]);
    }

    #[tokio::test]
    async fn test_select_new_class() {
        let gradebook = fixture().await;
        let outcome = gradebook.enrollment().select("s1", "tc3").await.unwrap();
        assert!(outcome.succeeded(), "{outcome}");
        let selected = gradebook.enrollment().selected_classes("s1").await.unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[tokio::test]
    async fn test_select_duplicate_fails() {
        let gradebook = fixture().await;
        let outcome = gradebook.enrollment().select("s1", "tc1").await.unwrap();
        assert!(!outcome.succeeded());
        assert!(outcome.detail().contains("already selected"));
    }

    #[tokio::test]
    async fn test_select_second_class_of_same_course_fails() {
        let gradebook = fixture().await;
        let outcome = gradebook.enrollment().select("s1", "tc2").await.unwrap();
        assert!(!outcome.succeeded());
        assert!(outcome.detail().contains("math101"));
    }

    #[tokio::test]
    async fn test_select_unknown_class_fails() {
        let gradebook = fixture().await;
        let outcome = gradebook.enrollment().select("s1", "tc99").await.unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.detail(), "teaching class 'tc99' does not exist");
    }
}
