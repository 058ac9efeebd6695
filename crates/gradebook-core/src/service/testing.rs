//! In-memory repositories shared by the service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gradebook_types::academic::{Account, Course, Role, TeachingClass};
use gradebook_types::error::{AuthError, RepositoryError};
use gradebook_types::grade::{GradeRecord, ScoreSheet};
use uuid::Uuid;

use crate::repository::account::AccountRepository;
use crate::repository::course::CourseRepository;
use crate::repository::enrollment::EnrollmentRepository;
use crate::repository::grade::GradeRepository;
use crate::service::gradebook::Gradebook;
use crate::service::hash::PasswordHasher;

pub type MockGradebook =
    Gradebook<MockAccounts, MockCourses, MockEnrollments, MockGrades, PlainHasher>;

#[derive(Default)]
pub struct MockAccounts {
    accounts: Mutex<BTreeMap<String, Account>>,
}

impl AccountRepository for MockAccounts {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.user_id) {
            return Err(RepositoryError::Conflict(account.user_id.clone()));
        }
        accounts.insert(account.user_id.clone(), account.clone());
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.accounts.lock().unwrap().get(user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        Ok(self.accounts.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, account: &Account) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.get_mut(&account.user_id) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MockCourses {
    courses: Mutex<BTreeMap<String, Course>>,
    classes: Mutex<BTreeMap<String, TeachingClass>>,
}

impl CourseRepository for MockCourses {
    async fn create_course(&self, course: &Course) -> Result<(), RepositoryError> {
        self.courses
            .lock()
            .unwrap()
            .insert(course.cid.clone(), course.clone());
        Ok(())
    }

    async fn get_course(&self, cid: &str) -> Result<Option<Course>, RepositoryError> {
        Ok(self.courses.lock().unwrap().get(cid).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        Ok(self.courses.lock().unwrap().values().cloned().collect())
    }

    async fn create_class(&self, class: &TeachingClass) -> Result<(), RepositoryError> {
        self.classes
            .lock()
            .unwrap()
            .insert(class.tcid.clone(), class.clone());
        Ok(())
    }

    async fn get_class(&self, tcid: &str) -> Result<Option<TeachingClass>, RepositoryError> {
        Ok(self.classes.lock().unwrap().get(tcid).cloned())
    }

    async fn list_classes(&self) -> Result<Vec<TeachingClass>, RepositoryError> {
        Ok(self.classes.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MockEnrollments {
    pairs: Mutex<BTreeSet<(String, String)>>,
}

impl EnrollmentRepository for MockEnrollments {
    async fn enroll(&self, sid: &str, tcid: &str) -> Result<(), RepositoryError> {
        if !self
            .pairs
            .lock()
            .unwrap()
            .insert((sid.to_string(), tcid.to_string()))
        {
            return Err(RepositoryError::Conflict(format!("{sid} in {tcid}")));
        }
        Ok(())
    }

    async fn classes_of_student(&self, sid: &str) -> Result<Vec<String>, RepositoryError> {
        let mut tcids: Vec<String> = self
            .pairs
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == sid)
            .map(|(_, t)| t.clone())
            .collect();
        tcids.sort();
        Ok(tcids)
    }

    async fn students_of_class(&self, tcid: &str) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .pairs
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t)| t == tcid)
            .map(|(s, _)| s.clone())
            .collect())
    }
}

#[derive(Default)]
pub struct MockGrades {
    records: Mutex<BTreeMap<(String, String), GradeRecord>>,
}

impl GradeRepository for MockGrades {
    async fn get(&self, sid: &str, cid: &str) -> Result<Option<GradeRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(sid.to_string(), cid.to_string()))
            .cloned())
    }

    async fn list_for_student(&self, sid: &str) -> Result<Vec<GradeRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.sid == sid)
            .cloned()
            .collect())
    }

    async fn merge_scores(
        &self,
        sid: &str,
        cid: &str,
        scores: &ScoreSheet,
        updated_at: DateTime<Utc>,
    ) -> Result<GradeRecord, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let key = (sid.to_string(), cid.to_string());
        let (gid, merged) = match records.get(&key) {
            Some(existing) => (existing.gid, scores.or_existing(&existing.scores)),
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
        records.insert(key, record.clone());
        Ok(record)
    }
}

/// Reversible "hash" so tests can assert on stored values.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{password}")
    }
}

pub fn account(user_id: &str, role: Role, name: &str) -> Account {
    Account {
        user_id: user_id.to_string(),
        role,
        name: name.to_string(),
        gender: "F".to_string(),
        age: Some(20),
        password_hash: format!("plain:{user_id}-pw"),
    }
}

/// A small fixture: one teacher per class, two classes of `math101`, one of
/// `eng101`, three students.
pub async fn fixture() -> MockGradebook {
    let gradebook = Gradebook::new(
        MockAccounts::default(),
        MockCourses::default(),
        MockEnrollments::default(),
        MockGrades::default(),
        PlainHasher,
    );

    let accounts = gradebook.accounts();
    accounts.create(&account("admin", Role::Admin, "Root")).await.unwrap();
    accounts.create(&account("t1", Role::Teacher, "Teacher One")).await.unwrap();
    accounts.create(&account("t2", Role::Teacher, "Teacher Two")).await.unwrap();
    accounts.create(&account("s1", Role::Student, "Carol")).await.unwrap();
    accounts.create(&account("s2", Role::Student, "Alice")).await.unwrap();
    accounts.create(&account("s3", Role::Student, "Bob")).await.unwrap();

    let courses = gradebook.courses();
    for (cid, name) in [("math101", "Calculus"), ("eng101", "English")] {
        courses
            .create_course(&Course {
                cid: cid.to_string(),
                name: name.to_string(),
            })
            .await
            .unwrap();
    }
    for (tcid, cid, tid) in [("tc1", "math101", "t1"), ("tc2", "math101", "t2"), ("tc3", "eng101", "t2")] {
        courses
            .create_class(&TeachingClass {
                tcid: tcid.to_string(),
                cid: cid.to_string(),
                tid: tid.to_string(),
                term: 1,
                name: format!("{cid}-{tcid}"),
            })
            .await
            .unwrap();
    }

    let enrollments = gradebook.enrollments();
    for sid in ["s1", "s2", "s3"] {
        enrollments.enroll(sid, "tc1").await.unwrap();
    }
    gradebook
}
