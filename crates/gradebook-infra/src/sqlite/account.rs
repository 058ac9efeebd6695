//! SQLite account repository implementation.

use gradebook_core::repository::account::AccountRepository;
use gradebook_types::academic::{Account, Role};
use gradebook_types::error::RepositoryError;
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `AccountRepository`.
pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct AccountRow {
    user_id: String,
    role: String,
    name: String,
    gender: String,
    age: Option<i64>,
    password_hash: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            role: row.try_get("role")?,
            name: row.try_get("name")?,
            gender: row.try_get("gender")?,
            age: row.try_get("age")?,
            password_hash: row.try_get("password_hash")?,
        })
    }

    fn into_account(self) -> Result<Account, RepositoryError> {
        let role: Role = self.role.parse().map_err(RepositoryError::Query)?;
        let age = self
            .age
            .map(u32::try_from)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid age: {e}")))?;

        Ok(Account {
            user_id: self.user_id,
            role,
            name: self.name,
            gender: self.gender,
            age,
            password_hash: self.password_hash,
        })
    }
}

const SELECT_ACCOUNT: &str =
    "SELECT user_id, role, name, gender, age, password_hash FROM accounts";

impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO accounts (user_id, role, name, gender, age, password_hash)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&account.user_id)
        .bind(account.role.to_string())
        .bind(&account.name)
        .bind(&account.gender)
        .bind(account.age.map(i64::from))
        .bind(&account.password_hash)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_ACCOUNT} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let account_row =
                    AccountRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_ACCOUNT} ORDER BY user_id"))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                AccountRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_account()
            })
            .collect()
    }

    async fn update(&self, account: &Account) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE accounts SET name = ?, gender = ?, age = ?, password_hash = ?
               WHERE user_id = ?"#,
        )
        .bind(&account.name)
        .bind(&account.gender)
        .bind(account.age.map(i64::from))
        .bind(&account.password_hash)
        .bind(&account.user_id)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count.max(0) as u64)
    }
}
