use thiserror::Error;

/// Errors constructing an [`Outcome`](crate::outcome::Outcome).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("outcome detail is required")]
    MissingDetail,
}

/// Errors from repository operations (used by trait definitions in gradebook-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to login and sessions.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user '{0}' does not exist")]
    UnknownUser(String),

    #[error("wrong password")]
    WrongPassword,

    #[error("session expired, please log in again")]
    SessionExpired,

    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to grades, classes and enrolments.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("teaching class '{0}' not found")]
    ClassNotFound(String),

    #[error("course '{0}' not found")]
    CourseNotFound(String),

    #[error("student '{0}' not found")]
    StudentNotFound(String),

    #[error("{component} must be between 0 and 100, got {value}")]
    ScoreOutOfRange { component: String, value: f64 },

    #[error("'{0}' is not a number")]
    InvalidScore(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors loading the demo data set.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Grade(#[from] GradeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors talking to the discovery registry.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery registry at {endpoint} is unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    #[error("discovery registry rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid response from discovery registry: {0}")]
    InvalidResponse(String),

    #[error("failed to build discovery client: {0}")]
    Client(String),
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
