use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// The role an account logs in with. Determines the terminal menu and which
/// grade operations are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A user of the system (student, teacher or administrator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Login id, e.g. "student1" or "teacher3".
    pub user_id: String,
    pub role: Role,
    pub name: String,
    pub gender: String,
    pub age: Option<u32>,
    /// PHC-formatted password hash. Never serialized to API clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl Account {
    /// Public view of the account, without credentials.
    pub fn profile(&self) -> Profile {
        Profile {
            user_id: self.user_id.clone(),
            role: self.role,
            name: self.name.clone(),
            gender: self.gender.clone(),
            age: self.age,
        }
    }
}

/// Personal information shown by "show personal info".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub role: Role,
    pub name: String,
    pub gender: String,
    pub age: Option<u32>,
}

/// Requested changes to a profile. `None` (or blank terminal input) leaves the
/// field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    /// Raw age input; validated by the profile service.
    pub age: Option<String>,
    pub password: Option<String>,
}

impl ProfileUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.gender.is_none() && self.age.is_none() && self.password.is_none()
    }
}

/// A course in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub cid: String,
    pub name: String,
}

/// One section of a course, taught by one teacher in one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeachingClass {
    pub tcid: String,
    pub cid: String,
    /// User id of the teaching teacher.
    pub tid: String,
    pub term: u32,
    pub name: String,
}

/// A teaching class joined with its course and teacher names, as listed by
/// "view courses" and "select course".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassListing {
    pub tcid: String,
    pub course_name: String,
    pub class_name: String,
    pub teacher_name: String,
}
