//! Personal information: view and update your own profile, and the admin
//! account listing.

use std::sync::Arc;

use gradebook_types::academic::{Profile, ProfileUpdate};
use gradebook_types::error::{AuthError, RepositoryError};
use gradebook_types::outcome::Outcome;

use crate::repository::account::AccountRepository;
use crate::service::hash::PasswordHasher;

pub struct ProfileService<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
}

impl<A: AccountRepository, H: PasswordHasher> ProfileService<A, H> {
    pub fn new(accounts: Arc<A>, hasher: Arc<H>) -> Self {
        Self { accounts, hasher }
    }

    pub async fn personal_info(&self, user_id: &str) -> Result<Profile, AuthError> {
        self.accounts
            .get(user_id)
            .await?
            .map(|account| account.profile())
            .ok_or_else(|| AuthError::UnknownUser(user_id.to_string()))
    }

    /// Apply the non-blank fields of `update`.
    ///
    /// Business-rule failures (unknown user, non-numeric age) come back as a
    /// failed [`Outcome`] and leave the account untouched.
    pub async fn update_personal_info(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Outcome, AuthError> {
        let Some(mut account) = self.accounts.get(user_id).await? else {
            return Ok(Outcome::failure(format!("user '{user_id}' does not exist")));
        };

        let name = non_blank(update.name);
        let gender = non_blank(update.gender);
        let age = non_blank(update.age);
        let password = non_blank(update.password);

        if name.is_none() && gender.is_none() && age.is_none() && password.is_none() {
            return Ok(Outcome::success("nothing to update"));
        }

        if let Some(raw) = age {
            match raw.parse::<u32>() {
                Ok(value) => account.age = Some(value),
                Err(_) => {
                    return Ok(Outcome::failure(format!(
                        "age must be a whole number, got '{raw}'"
                    )));
                }
            }
        }
        if let Some(name) = name {
            account.name = name;
        }
        if let Some(gender) = gender {
            account.gender = gender;
        }
        if let Some(password) = password {
            account.password_hash = self.hasher.hash(&password)?;
        }

        self.accounts.update(&account).await?;
        tracing::info!(user_id, "personal information updated");
        Ok(Outcome::success("personal information updated"))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Profile>, RepositoryError> {
        let accounts = self.accounts.list().await?;
        Ok(accounts.iter().map(|a| a.profile()).collect())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
