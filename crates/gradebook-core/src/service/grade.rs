//! Grade entry, transcripts, class grade tables and distributions.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::Utc;

use gradebook_types::academic::{Role, TeachingClass};
use gradebook_types::error::GradeError;
use gradebook_types::grade::{
    Distribution, GradeRecord, GradeRow, ScoreSheet, SortDirection, SortKey, TranscriptRow,
};

use crate::repository::account::AccountRepository;
use crate::repository::course::CourseRepository;
use crate::repository::enrollment::EnrollmentRepository;
use crate::repository::grade::GradeRepository;

pub struct GradeService<A, C, E, G> {
    accounts: Arc<A>,
    courses: Arc<C>,
    enrollments: Arc<E>,
    grades: Arc<G>,
}

impl<A, C, E, G> GradeService<A, C, E, G>
where
    A: AccountRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    G: GradeRepository,
{
    pub fn new(accounts: Arc<A>, courses: Arc<C>, enrollments: Arc<E>, grades: Arc<G>) -> Self {
        Self {
            accounts,
            courses,
            enrollments,
            grades,
        }
    }

    /// Store scores for a student in a course.
    ///
    /// Components absent from `scores` keep their stored value. The total is
    /// recomputed from the merged sheet.
    pub async fn record_scores(
        &self,
        sid: &str,
        cid: &str,
        scores: ScoreSheet,
    ) -> Result<GradeRecord, GradeError> {
        scores.validate()?;

        if self.courses.get_course(cid).await?.is_none() {
            return Err(GradeError::CourseNotFound(cid.to_string()));
        }
        match self.accounts.get(sid).await? {
            Some(account) if account.role == Role::Student => {}
            _ => return Err(GradeError::StudentNotFound(sid.to_string())),
        }

        let record = self
            .grades
            .merge_scores(sid, cid, &scores, Utc::now())
            .await?;
        tracing::info!(sid, cid, total = record.total, "grade recorded");
        Ok(record)
    }

    /// Every grade of a student, with course names.
    pub async fn transcript(&self, sid: &str) -> Result<Vec<TranscriptRow>, GradeError> {
        let mut rows = Vec::new();
        for record in self.grades.list_for_student(sid).await? {
            let course_name = self
                .courses
                .get_course(&record.cid)
                .await?
                .map(|c| c.name)
                .unwrap_or_else(|| record.cid.clone());
            rows.push(TranscriptRow {
                cid: record.cid,
                course_name,
                scores: record.scores,
                total: record.total,
            });
        }
        Ok(rows)
    }

    pub async fn class(&self, tcid: &str) -> Result<TeachingClass, GradeError> {
        self.courses
            .get_class(tcid)
            .await?
            .ok_or_else(|| GradeError::ClassNotFound(tcid.to_string()))
    }

    /// One row per enrolled student, ordered by sid. Students without a grade
    /// have no scores and no total.
    pub async fn grade_table(&self, tcid: &str) -> Result<Vec<GradeRow>, GradeError> {
        let class = self.class(tcid).await?;
        let mut rows = Vec::new();
        for sid in self.enrollments.students_of_class(tcid).await? {
            let name = self
                .accounts
                .get(&sid)
                .await?
                .map(|a| a.name)
                .unwrap_or_else(|| sid.clone());
            let record = self.grades.get(&sid, &class.cid).await?;
            rows.push(GradeRow {
                sid,
                name,
                scores: record.as_ref().map(|r| r.scores),
                total: record.map(|r| r.total),
            });
        }
        Ok(rows)
    }

    pub async fn sorted_grade_table(
        &self,
        tcid: &str,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<GradeRow>, GradeError> {
        let mut rows = self.grade_table(tcid).await?;
        sort_rows(&mut rows, key, direction);
        Ok(rows)
    }

    pub async fn distribution(&self, tcid: &str) -> Result<Distribution, GradeError> {
        let rows = self.grade_table(tcid).await?;
        Ok(rows.iter().map(|r| r.total).collect())
    }

    /// Whether `user_id` may enter grades for teaching class `tcid`: its
    /// teacher, or any admin.
    pub async fn can_grade(&self, user_id: &str, role: Role, tcid: &str) -> Result<bool, GradeError> {
        let class = self.class(tcid).await?;
        Ok(match role {
            Role::Admin => true,
            Role::Teacher => class.tid == user_id,
            Role::Student => false,
        })
    }

    /// Whether `user_id` may enter the grade of `sid` in course `cid`: an
    /// admin, or the teacher of a class of that course the student attends.
    pub async fn can_grade_student(
        &self,
        user_id: &str,
        role: Role,
        sid: &str,
        cid: &str,
    ) -> Result<bool, GradeError> {
        match role {
            Role::Admin => Ok(true),
            Role::Student => Ok(false),
            Role::Teacher => {
                let attended = self.enrollments.classes_of_student(sid).await?;
                let classes = self.courses.list_classes().await?;
                Ok(classes.iter().any(|c| {
                    c.cid == cid && c.tid == user_id && attended.contains(&c.tcid)
                }))
            }
        }
    }
}

/// Sort a grade table in place.
///
/// `sid` and `name` compare as text, every other key numerically. Rows with no
/// value for a numeric key go last whatever the direction. The sort is stable.
pub fn sort_rows(rows: &mut [GradeRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| compare_rows(a, b, key, direction));
}

fn compare_rows(a: &GradeRow, b: &GradeRow, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match key {
        SortKey::Sid => a.sid.cmp(&b.sid),
        SortKey::Name => a.name.cmp(&b.name),
        _ => match (a.score_for(key), b.score_for(key)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gradebook_types::grade::{GradeBand, ScoreComponent};

    use crate::service::testing::fixture;

    fn sheet(usual: f64, midterm: f64, lab: f64, final_exam: f64) -> ScoreSheet {
        ScoreSheet {
            usual: Some(usual),
            midterm: Some(midterm),
            lab: Some(lab),
            final_exam: Some(final_exam),
        }
    }

    fn row(sid: &str, name: &str, total: Option<f64>) -> GradeRow {
        GradeRow {
            sid: sid.to_string(),
            name: name.to_string(),
            scores: total.map(|t| ScoreSheet {
                final_exam: Some(t),
                ..Default::default()
            }),
            total,
        }
    }

    fn sids(rows: &[GradeRow]) -> Vec<&str> {
        rows.iter().map(|r| r.sid.as_str()).collect()
    }

    #[tokio::test]
    async fn test_record_scores_computes_total() {
        let gradebook = fixture().await;
        let record = gradebook
            .grades()
            .record_scores("s1", "math101", sheet(90.0, 80.0, 70.0, 85.0))
            .await
            .unwrap();
        // 18 + 16 + 14 + 34
        assert_eq!(record.total, 82.0);
    }

    #[tokio::test]
    async fn test_record_scores_merges_with_existing() {
        let gradebook = fixture().await;
        let grades = gradebook.grades();
        let first = grades
            .record_scores("s1", "math101", sheet(90.0, 80.0, 70.0, 85.0))
            .await
            .unwrap();

        let partial = ScoreSheet {
            final_exam: Some(95.0),
            ..Default::default()
        };
        let second = grades.record_scores("s1", "math101", partial).await.unwrap();

        assert_eq!(second.gid, first.gid);
        assert_eq!(second.scores.usual, Some(90.0));
        assert_eq!(second.scores.final_exam, Some(95.0));
        assert_eq!(second.total, 86.0);
    }

    #[tokio::test]
    async fn test_record_scores_missing_components_count_as_zero() {
        let gradebook = fixture().await;
        let partial = ScoreSheet {
            usual: Some(77.7),
            ..Default::default()
        };
        let record = gradebook
            .grades()
            .record_scores("s2", "math101", partial)
            .await
            .unwrap();
        assert_eq!(record.total, 15.54);
    }

    #[tokio::test]
    async fn test_record_scores_rejects_bad_input() {
        let gradebook = fixture().await;
        let grades = gradebook.grades();

        let mut out_of_range = ScoreSheet::default();
        out_of_range.set(ScoreComponent::Lab, Some(101.0));
        assert!(matches!(
            grades.record_scores("s1", "math101", out_of_range).await,
            Err(GradeError::ScoreOutOfRange { .. })
        ));
        assert!(matches!(
            grades.record_scores("s1", "bio999", ScoreSheet::default()).await,
            Err(GradeError::CourseNotFound(_))
        ));
        assert!(matches!(
            grades.record_scores("t1", "math101", ScoreSheet::default()).await,
            Err(GradeError::StudentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_transcript_uses_course_names() {
        let gradebook = fixture().await;
        gradebook
            .grades()
            .record_scores("s3", "math101", sheet(60.0, 60.0, 60.0, 60.0))
            .await
            .unwrap();
        let transcript = gradebook.grades().transcript("s3").await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].course_name, "Calculus");
        assert_eq!(transcript[0].total, 60.0);
        assert!(gradebook.grades().transcript("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grade_table_and_distribution() {
        let gradebook = fixture().await;
        let grades = gradebook.grades();
        grades
            .record_scores("s1", "math101", sheet(95.0, 95.0, 95.0, 95.0))
            .await
            .unwrap();
        grades
            .record_scores("s2", "math101", sheet(50.0, 50.0, 50.0, 50.0))
            .await
            .unwrap();

        let table = grades.grade_table("tc1").await.unwrap();
        assert_eq!(sids(&table), vec!["s1", "s2", "s3"]);
        assert_eq!(table[0].total, Some(95.0));
        assert_eq!(table[2].total, None);

        let distribution = grades.distribution("tc1").await.unwrap();
        assert_eq!(distribution.count(GradeBand::Excellent), 1);
        assert_eq!(distribution.count(GradeBand::Fail), 1);
        assert_eq!(distribution.count(GradeBand::Missing), 1);
        assert_eq!(distribution.total(), 3);

        assert!(matches!(
            grades.grade_table("nope").await,
            Err(GradeError::ClassNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sorted_grade_table_by_name() {
        let gradebook = fixture().await;
        let rows = gradebook
            .grades()
            .sorted_grade_table("tc1", SortKey::Name, SortDirection::Asc)
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_sort_numeric_missing_last_both_directions() {
        let mut rows = vec![
            row("a", "A", None),
            row("b", "B", Some(70.0)),
            row("c", "C", Some(9.5)),
            row("d", "D", Some(100.0)),
        ];

        sort_rows(&mut rows, SortKey::Total, SortDirection::Asc);
        assert_eq!(sids(&rows), vec!["c", "b", "d", "a"]);

        sort_rows(&mut rows, SortKey::Total, SortDirection::Desc);
        assert_eq!(sids(&rows), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_sort_component_is_numeric_not_lexical() {
        let mut rows = vec![row("x", "X", Some(100.0)), row("y", "Y", Some(9.0))];
        sort_rows(
            &mut rows,
            SortKey::Component(ScoreComponent::Final),
            SortDirection::Asc,
        );
        assert_eq!(sids(&rows), vec!["y", "x"]);

        sort_rows(&mut rows, SortKey::Component(ScoreComponent::Usual), SortDirection::Asc);
        assert_eq!(sids(&rows), vec!["y", "x"], "all missing keeps order");
    }

    #[test]
    fn test_sort_sid_desc() {
        let mut rows = vec![row("s1", "", None), row("s3", "", None), row("s2", "", None)];
        sort_rows(&mut rows, SortKey::Sid, SortDirection::Desc);
        assert_eq!(sids(&rows), vec!["s3", "s2", "s1"]);
    }

    #[tokio::test]
    async fn test_can_grade() {
        let gradebook = fixture().await;
        let grades = gradebook.grades();
        assert!(grades.can_grade("t1", Role::Teacher, "tc1").await.unwrap());
        assert!(!grades.can_grade("t2", Role::Teacher, "tc1").await.unwrap());
        assert!(grades.can_grade("admin", Role::Admin, "tc1").await.unwrap());
        assert!(!grades.can_grade("s1", Role::Student, "tc1").await.unwrap());
        assert!(grades.can_grade("t1", Role::Teacher, "tc9").await.is_err());
    }

    #[tokio::test]
    async fn test_can_grade_student() {
        let gradebook = fixture().await;
        let grades = gradebook.grades();
        assert!(grades
            .can_grade_student("t1", Role::Teacher, "s1", "math101")
            .await
            .unwrap());
        // t2 teaches math101 too, but not the class s1 attends.
        assert!(!grades
            .can_grade_student("t2", Role::Teacher, "s1", "math101")
            .await
            .unwrap());
        assert!(grades
            .can_grade_student("admin", Role::Admin, "s1", "eng101")
            .await
            .unwrap());
    }
}
