//! Registration, login and token validation
//!
//! Sessions are server-issued opaque tokens; credentials are only ever
//! compared server-side.

use uuid::Uuid;

use crate::domain::{Role, Session, User};
use crate::service::SharedStore;
use crate::{Error, Result};

/// An authenticated caller, as resolved from a bearer token.
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
}

impl AuthService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn register(&self, username: String, email: String, password: String) -> Result<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("username and password are required"));
        }
        self.store
            .insert_user(User::new(username, email, password, Role::Customer))
            .await
    }

    /// Issues a session token on a successful credential check.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, Session)> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(Error::Unauthorized)?;
        if user.password != password {
            return Err(Error::Unauthorized);
        }
        let session = Session::issue(&user);
        self.store.insert_session(session.clone()).await?;
        Ok((user, session))
    }

    pub async fn authenticate(&self, token: &str) -> Result<Caller> {
        let session = self.store.session(token).await?.ok_or(Error::Unauthorized)?;
        Ok(Caller {
            user_id: session.user_id,
            role: session.role,
        })
    }

    /// Creates the staff account on first boot so the back office is
    /// reachable before any registration has happened.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<()> {
        if self.store.find_user_by_username(username).await?.is_some() {
            return Ok(());
        }
        self.store
            .insert_user(User::new(
                username.to_string(),
                email.to_string(),
                password.to_string(),
                Role::Staff,
            ))
            .await?;
        tracing::info!(username, "bootstrapped staff account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_login_issues_usable_token() {
        let auth = service();
        auth.register("asha".into(), "asha@example.com".into(), "secret".into())
            .await
            .unwrap();
        let (user, session) = auth.login("asha", "secret").await.unwrap();
        assert_eq!(user.role, Role::Customer);
        let caller = auth.authenticate(&session.token).await.unwrap();
        assert_eq!(caller.user_id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let auth = service();
        auth.register("asha".into(), "asha@example.com".into(), "secret".into())
            .await
            .unwrap();
        assert!(matches!(
            auth.login("asha", "wrong").await.unwrap_err(),
            Error::Unauthorized
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_idempotent() {
        let auth = service();
        auth.bootstrap_admin("owner", "o@example.com", "pw").await.unwrap();
        auth.bootstrap_admin("owner", "o@example.com", "pw").await.unwrap();
        let (user, _) = auth.login("owner", "pw").await.unwrap();
        assert!(user.role.is_staff());
    }
}
