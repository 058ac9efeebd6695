//! Login and session management.
//!
//! A successful login issues an opaque UUID v4 token and revokes any token the
//! same user held before, so each user has at most one open session. Every
//! protected operation, whether typed at the terminal or sent over HTTP,
//! resolves the token back to a [`Session`] before doing anything else.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use gradebook_types::academic::Role;
use gradebook_types::error::AuthError;

use crate::repository::account::AccountRepository;
use crate::service::hash::PasswordHasher;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
}

pub struct AuthService<A, H> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    sessions: DashMap<String, Session>,
}

impl<A: AccountRepository, H: PasswordHasher> AuthService<A, H> {
    pub fn new(accounts: Arc<A>, hasher: Arc<H>) -> Self {
        Self {
            accounts,
            hasher,
            sessions: DashMap::new(),
        }
    }

    /// Check credentials and open a session, replacing the user's previous one.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<Session, AuthError> {
        let account = self
            .accounts
            .get(user_id)
            .await?
            .ok_or_else(|| AuthError::UnknownUser(user_id.to_string()))?;

        if !self.hasher.verify(password, &account.password_hash) {
            tracing::warn!(user_id, "login rejected: wrong password");
            return Err(AuthError::WrongPassword);
        }

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: account.user_id,
            role: account.role,
            issued_at: Utc::now(),
        };
        let before = self.sessions.len();
        self.sessions.retain(|_, open| open.user_id != session.user_id);
        let replaced = before.saturating_sub(self.sessions.len());
        self.sessions.insert(session.token.clone(), session.clone());
        tracing::info!(
            user_id = %session.user_id,
            role = %session.role,
            replaced,
            "login succeeded"
        );
        Ok(session)
    }

    /// Resolve a token to its session, if it is still open.
    pub fn validate(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    /// Like [`validate`](Self::validate), but an unknown token is an error.
    pub fn require(&self, token: &str) -> Result<Session, AuthError> {
        self.validate(token).ok_or(AuthError::SessionExpired)
    }

    /// Close a session. Returns false if the token was not open.
    pub fn logout(&self, token: &str) -> bool {
        match self.sessions.remove(token) {
            Some((_, session)) => {
                tracing::info!(user_id = %session.user_id, "logged out");
                true
            }
            None => false,
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use gradebook_types::error::AuthError;

    use crate::service::testing::fixture;

    #[tokio::test]
    async fn test_login_unknown_user() {
        let gradebook = fixture().await;
        let err = gradebook.auth().login("nobody", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser(ref u) if u == "nobody"));
        assert_eq!(err.to_string(), "user 'nobody' does not exist");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let gradebook = fixture().await;
        let err = gradebook.auth().login("s1", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
        assert_eq!(gradebook.auth().active_sessions(), 0);
    }

    #[tokio::test]
    async fn test_relogin_replaces_previous_token() {
        let gradebook = fixture().await;
        let auth = gradebook.auth();
        let first = auth.login("s1", "s1-pw").await.unwrap();
        let second = auth.login("s1", "s1-pw").await.unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(first.role, gradebook_types::academic::Role::Student);

        assert!(auth.validate(&first.token).is_none());
        let resolved = auth.validate(&second.token).unwrap();
        assert_eq!(resolved.user_id, "s1");
        assert_eq!(auth.active_sessions(), 1);
    }

    #[tokio::test]
    async fn test_repeated_logins_keep_one_session_per_user() {
        let gradebook = fixture().await;
        let auth = gradebook.auth();
        let teacher = auth.login("t1", "t1-pw").await.unwrap();
        let mut last = None;
        for _ in 0..50 {
            last = Some(auth.login("s1", "s1-pw").await.unwrap());
        }

        assert_eq!(auth.active_sessions(), 2);
        assert!(auth.validate(&teacher.token).is_some());
        assert!(auth.validate(&last.unwrap().token).is_some());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let gradebook = fixture().await;
        let auth = gradebook.auth();
        let session = auth.login("s1", "s1-pw").await.unwrap();

        assert!(auth.login("s1", "wrong").await.is_err());
        assert!(auth.validate(&session.token).is_some());
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let gradebook = fixture().await;
        let auth = gradebook.auth();
        let session = auth.login("t1", "t1-pw").await.unwrap();

        assert!(auth.logout(&session.token));
        assert!(auth.validate(&session.token).is_none());
        assert!(matches!(
            auth.require(&session.token),
            Err(AuthError::SessionExpired)
        ));
        assert!(!auth.logout(&session.token));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let gradebook = fixture().await;
        assert!(gradebook.auth().validate("not-a-token").is_none());
    }
}
