//! Demo data set: one admin, five teachers, twenty students, three courses
//! and five teaching classes, with grades entered for most enrolments.
//!
//! Scores are derived from the student number so the data set is the same on
//! every run.

use gradebook_types::academic::{Account, Course, Role, TeachingClass};
use gradebook_types::error::SeedError;
use gradebook_types::grade::ScoreSheet;
use gradebook_types::outcome::Outcome;

use crate::repository::account::AccountRepository;
use crate::repository::course::CourseRepository;
use crate::repository::enrollment::EnrollmentRepository;
use crate::repository::grade::GradeRepository;
use crate::service::gradebook::Gradebook;
use crate::service::hash::PasswordHasher;

pub const DEMO_STUDENTS: u32 = 20;

const TEACHERS: [(&str, &str, &str); 5] = [
    ("teacher1", "Margaret Hale", "F"),
    ("teacher2", "Thomas Reed", "M"),
    ("teacher3", "Lena Fischer", "F"),
    ("teacher4", "Omar Haddad", "M"),
    ("teacher5", "Grace Okafor", "F"),
];

const COURSES: [(&str, &str); 3] = [
    ("Eng101", "English Composition"),
    ("math101", "Calculus I"),
    ("math201", "Linear Algebra"),
];

/// (tcid, cid, teacher, term, name)
const CLASSES: [(&str, &str, &str, u32, &str); 5] = [
    ("tc001", "Eng101", "teacher1", 1, "English Composition A"),
    ("tc002", "Eng101", "teacher2", 1, "English Composition B"),
    ("tc003", "math101", "teacher3", 1, "Calculus I A"),
    ("tc004", "math101", "teacher4", 1, "Calculus I B"),
    ("tc005", "math201", "teacher5", 2, "Linear Algebra A"),
];

impl<A, C, E, G, H> Gradebook<A, C, E, G, H>
where
    A: AccountRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    G: GradeRepository,
    H: PasswordHasher,
{
    /// Load the demo data set. Every demo account created gets `password`.
    ///
    /// Entities already present are kept as they are, so a run that failed
    /// partway is completed by running again. A store whose accounts are not
    /// demo data, or that already holds the whole data set, is left alone and
    /// a failed [`Outcome`] explains why.
    pub async fn seed_demo_data(&self, password: &str) -> Result<Outcome, SeedError> {
        let existing = self.accounts().count().await?;
        if existing > 0 && self.accounts().get(DEMO_ADMIN).await?.is_none() {
            return Ok(Outcome::failure(format!(
                "store already holds {existing} accounts; nothing seeded"
            )));
        }

        let password_hash = self.hasher().hash(password)?;
        let mut plan = Vec::with_capacity(1 + TEACHERS.len() + DEMO_STUDENTS as usize);
        plan.push(demo_account(
            DEMO_ADMIN.to_string(),
            Role::Admin,
            "Administrator".to_string(),
            "",
            None,
        ));
        for (i, (user_id, name, gender)) in TEACHERS.into_iter().enumerate() {
            plan.push(demo_account(
                user_id.to_string(),
                Role::Teacher,
                name.to_string(),
                gender,
                Some(35 + i as u32 * 4),
            ));
        }
        for n in 1..=DEMO_STUDENTS {
            let gender = if n % 2 == 0 { "F" } else { "M" };
            plan.push(demo_account(
                format!("student{n}"),
                Role::Student,
                format!("Student {n:02}"),
                gender,
                Some(18 + n % 4),
            ));
        }

        let mut seeded = Seeded::default();
        for mut account in plan {
            if self.accounts().get(&account.user_id).await?.is_none() {
                account.password_hash = password_hash.clone();
                self.accounts().create(&account).await?;
                seeded.accounts += 1;
            }
        }

        for (cid, name) in COURSES {
            if self.courses().get_course(cid).await?.is_none() {
                self.courses()
                    .create_course(&Course {
                        cid: cid.to_string(),
                        name: name.to_string(),
                    })
                    .await?;
                seeded.courses += 1;
            }
        }
        for (tcid, cid, tid, term, name) in CLASSES {
            if self.courses().get_class(tcid).await?.is_none() {
                self.courses()
                    .create_class(&TeachingClass {
                        tcid: tcid.to_string(),
                        cid: cid.to_string(),
                        tid: tid.to_string(),
                        term,
                        name: name.to_string(),
                    })
                    .await?;
                seeded.classes += 1;
            }
        }

        for n in 1..=DEMO_STUDENTS {
            let sid = format!("student{n}");
            let attended = self.enrollments().classes_of_student(&sid).await?;
            let graded: Vec<String> = self
                .grades()
                .transcript(&sid)
                .await?
                .into_iter()
                .map(|row| row.cid)
                .collect();
            let english = if n % 2 == 1 { "tc001" } else { "tc002" };
            let calculus = if n <= DEMO_STUDENTS / 2 { "tc003" } else { "tc004" };

            for (salt, (tcid, cid)) in [(english, "Eng101"), (calculus, "math101")].into_iter().enumerate() {
                if !attended.iter().any(|t| t == tcid) {
                    self.enrollments().enroll(&sid, tcid).await?;
                    seeded.enrolments += 1;
                }
                // The last student has no calculus grade yet.
                if cid == "math101" && n == DEMO_STUDENTS {
                    continue;
                }
                if !graded.iter().any(|c| c == cid) {
                    self.grades()
                        .record_scores(&sid, cid, demo_sheet(n, salt as u32))
                        .await?;
                    seeded.grades += 1;
                }
            }
            // Even-numbered students also take linear algebra; no grades yet.
            if n % 2 == 0 && !attended.iter().any(|t| t == "tc005") {
                self.enrollments().enroll(&sid, "tc005").await?;
                seeded.enrolments += 1;
            }
        }

        if seeded.is_empty() {
            return Ok(Outcome::failure("demo data already present; nothing seeded"));
        }
        tracing::info!(
            accounts = seeded.accounts,
            enrolments = seeded.enrolments,
            graded = seeded.grades,
            resumed = existing > 0,
            "demo data seeded"
        );
        Ok(Outcome::success(seeded.to_string()))
    }
}

const DEMO_ADMIN: &str = "admin";

fn demo_account(user_id: String, role: Role, name: String, gender: &str, age: Option<u32>) -> Account {
    Account {
        user_id,
        role,
        name,
        gender: gender.to_string(),
        age,
        password_hash: String::new(),
    }
}

/// What one seeding run created.
#[derive(Debug, Default)]
struct Seeded {
    accounts: usize,
    courses: usize,
    classes: usize,
    enrolments: usize,
    grades: usize,
}

impl Seeded {
    fn is_empty(&self) -> bool {
        self.accounts + self.courses + self.classes + self.enrolments + self.grades == 0
    }
}

impl std::fmt::Display for Seeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seeded {} accounts, {} courses, {} classes, {} enrolments, {} grades",
            self.accounts, self.courses, self.classes, self.enrolments, self.grades
        )
    }
}

/// Deterministic scores in 40..=100 spread over every grade band.
fn demo_sheet(n: u32, salt: u32) -> ScoreSheet {
    let score = |k: u32| f64::from(40 + (n * 37 + salt * 17 + k * 23) % 61);
    ScoreSheet {
        usual: Some(score(1)),
        midterm: Some(score(2)),
        lab: Some(score(3)),
        final_exam: Some(score(4)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use gradebook_types::grade::GradeBand;

    use crate::service::testing::{MockAccounts, MockCourses, MockEnrollments, MockGrades, PlainHasher};

    fn empty() -> Gradebook<MockAccounts, MockCourses, MockEnrollments, MockGrades, PlainHasher> {
        Gradebook::new(
            MockAccounts::default(),
            MockCourses::default(),
            MockEnrollments::default(),
            MockGrades::default(),
            PlainHasher,
        )
    }

    #[tokio::test]
    async fn test_seed_populates_empty_store() {
        let gradebook = empty();
        let outcome = gradebook.seed_demo_data("secret").await.unwrap();
        assert!(outcome.succeeded(), "{outcome}");
        assert_eq!(gradebook.accounts().count().await.unwrap(), 26);

        let session = gradebook.auth().login("teacher3", "secret").await.unwrap();
        assert_eq!(session.role, Role::Teacher);

        let table = gradebook.grades().grade_table("tc004").await.unwrap();
        assert_eq!(table.len(), 10);
        let distribution = gradebook.grades().distribution("tc004").await.unwrap();
        assert_eq!(distribution.count(GradeBand::Missing), 1);

        let lin_alg = gradebook.grades().distribution("tc005").await.unwrap();
        assert_eq!(lin_alg.count(GradeBand::Missing), 10);
    }

    #[tokio::test]
    async fn test_seed_twice_creates_nothing_more() {
        let gradebook = empty();
        gradebook.seed_demo_data("secret").await.unwrap();
        let outcome = gradebook.seed_demo_data("other").await.unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.detail(), "demo data already present; nothing seeded");
        assert_eq!(gradebook.accounts().count().await.unwrap(), 26);
        assert!(gradebook.auth().login("student7", "secret").await.is_ok());
    }

    #[tokio::test]
    async fn test_seed_refuses_store_without_demo_accounts() {
        let gradebook = empty();
        gradebook
            .accounts()
            .create(&demo_account(
                "s1".to_string(),
                Role::Student,
                "Carol".to_string(),
                "F",
                None,
            ))
            .await
            .unwrap();

        let outcome = gradebook.seed_demo_data("secret").await.unwrap();
        assert!(!outcome.succeeded());
        assert_eq!(outcome.detail(), "store already holds 1 accounts; nothing seeded");
        assert_eq!(gradebook.accounts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_seed_completes_partially_seeded_store() {
        let gradebook = empty();
        // What an interrupted run leaves behind: a few accounts and one course.
        let mut admin = demo_account(
            DEMO_ADMIN.to_string(),
            Role::Admin,
            "Administrator".to_string(),
            "",
            None,
        );
        admin.password_hash = gradebook.hasher().hash("first").unwrap();
        gradebook.accounts().create(&admin).await.unwrap();
        let mut student = demo_account(
            "student1".to_string(),
            Role::Student,
            "Student 01".to_string(),
            "M",
            Some(19),
        );
        student.password_hash = gradebook.hasher().hash("first").unwrap();
        gradebook.accounts().create(&student).await.unwrap();
        gradebook
            .courses()
            .create_course(&Course {
                cid: "Eng101".to_string(),
                name: "English Composition".to_string(),
            })
            .await
            .unwrap();

        let outcome = gradebook.seed_demo_data("second").await.unwrap();
        assert!(outcome.succeeded(), "{outcome}");
        assert_eq!(
            outcome.detail(),
            "seeded 24 accounts, 2 courses, 5 classes, 50 enrolments, 39 grades"
        );
        assert_eq!(gradebook.accounts().count().await.unwrap(), 26);

        // Accounts that already existed keep their password.
        assert!(gradebook.auth().login("student1", "first").await.is_ok());
        assert!(gradebook.auth().login("student2", "second").await.is_ok());

        let tc004 = gradebook.grades().distribution("tc004").await.unwrap();
        assert_eq!(tc004.count(GradeBand::Missing), 1);
        let transcript = gradebook.grades().transcript("student1").await.unwrap();
        assert_eq!(transcript.len(), 2);

        assert!(!gradebook.seed_demo_data("third").await.unwrap().succeeded());
    }

    #[test]
    fn test_demo_sheet_in_range() {
        for n in 1..=DEMO_STUDENTS {
            for salt in 0..2 {
                assert!(demo_sheet(n, salt).validate().is_ok());
            }
        }
    }
}
