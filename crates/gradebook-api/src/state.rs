//! Application state wiring the domain services to their SQLite backends.
//!
//! `AppState` holds the concrete `Gradebook` used by the terminal controller,
//! the CLI commands and the HTTP handlers. `Gradebook` is generic over the
//! repository and hasher traits; `AppState` pins it to the infra
//! implementations.

use std::path::Path;
use std::sync::Arc;

use gradebook_core::service::gradebook::Gradebook;
use gradebook_infra::crypto::password::Argon2PasswordHasher;
use gradebook_infra::filesystem::ensure_data_dir;
use gradebook_infra::sqlite::account::SqliteAccountRepository;
use gradebook_infra::sqlite::course::SqliteCourseRepository;
use gradebook_infra::sqlite::enrollment::SqliteEnrollmentRepository;
use gradebook_infra::sqlite::grade::SqliteGradeRepository;
use gradebook_infra::sqlite::pool::{database_url, DatabasePool};

/// Concrete type alias for the facade pinned to infra implementations.
pub type ConcreteGradebook = Gradebook<
    SqliteAccountRepository,
    SqliteCourseRepository,
    SqliteEnrollmentRepository,
    SqliteGradeRepository,
    Argon2PasswordHasher,
>;

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub gradebook: Arc<ConcreteGradebook>,
}

impl AppState {
    /// Open (creating and migrating if needed) `gradebook.db` in `data_dir`.
    pub async fn init(data_dir: &Path) -> anyhow::Result<Self> {
        ensure_data_dir(data_dir).await?;

        let db_url = format!("{}?mode=rwc", database_url(data_dir));
        let pool = DatabasePool::new(&db_url).await?;

        let gradebook = Gradebook::new(
            SqliteAccountRepository::new(pool.clone()),
            SqliteCourseRepository::new(pool.clone()),
            SqliteEnrollmentRepository::new(pool.clone()),
            SqliteGradeRepository::new(pool),
            Argon2PasswordHasher::new(),
        );

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");
        Ok(Self {
            gradebook: Arc::new(gradebook),
        })
    }
}
