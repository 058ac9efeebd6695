//! The `Gradebook` facade: the single boundary the terminal controller and
//! the HTTP handlers use to reach domain logic.

use std::sync::Arc;

use crate::repository::account::AccountRepository;
use crate::repository::course::CourseRepository;
use crate::repository::enrollment::EnrollmentRepository;
use crate::repository::grade::GradeRepository;
use crate::service::auth::AuthService;
use crate::service::enrollment::EnrollmentService;
use crate::service::grade::GradeService;
use crate::service::hash::PasswordHasher;
use crate::service::profile::ProfileService;

/// All domain services wired over one set of repositories.
///
/// Generic over the storage backends so tests can run against in-memory
/// repositories while the binary uses SQLite.
pub struct Gradebook<A, C, E, G, H> {
    accounts: Arc<A>,
    courses: Arc<C>,
    enrollments: Arc<E>,
    hasher: Arc<H>,
    auth: AuthService<A, H>,
    profiles: ProfileService<A, H>,
    enrollment: EnrollmentService<A, C, E>,
    grades: GradeService<A, C, E, G>,
}

impl<A, C, E, G, H> Gradebook<A, C, E, G, H>
where
    A: AccountRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    G: GradeRepository,
    H: PasswordHasher,
{
    pub fn new(accounts: A, courses: C, enrollments: E, grades: G, hasher: H) -> Self {
        let accounts = Arc::new(accounts);
        let courses = Arc::new(courses);
        let enrollments = Arc::new(enrollments);
        let grades = Arc::new(grades);
        let hasher = Arc::new(hasher);

        Self {
            auth: AuthService::new(accounts.clone(), hasher.clone()),
            profiles: ProfileService::new(accounts.clone(), hasher.clone()),
            enrollment: EnrollmentService::new(
                accounts.clone(),
                courses.clone(),
                enrollments.clone(),
            ),
            grades: GradeService::new(
                accounts.clone(),
                courses.clone(),
                enrollments.clone(),
                grades,
            ),
            accounts,
            courses,
            enrollments,
            hasher,
        }
    }

    pub fn auth(&self) -> &AuthService<A, H> {
        &self.auth
    }

    pub fn profiles(&self) -> &ProfileService<A, H> {
        &self.profiles
    }

    pub fn enrollment(&self) -> &EnrollmentService<A, C, E> {
        &self.enrollment
    }

    pub fn grades(&self) -> &GradeService<A, C, E, G> {
        &self.grades
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn courses(&self) -> &C {
        &self.courses
    }

    pub fn enrollments(&self) -> &E {
        &self.enrollments
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }
}
