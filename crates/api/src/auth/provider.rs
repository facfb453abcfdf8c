//! Session provider.
//!
//! The process holds one "site" session used for public reads; it is
//! published on a `watch` channel so the data provider can react when it
//! settles. Admin sign-in is checked separately and never replaces the site
//! session.

use std::fmt::Debug;

use async_trait::async_trait;
use hearts_core::error::CoreError;
use tokio::sync::watch;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::config::AdminConfig;

/// An established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous { id: String },
    Admin { email: String },
}

#[async_trait]
pub trait AuthProvider: Debug + Send + Sync {
    /// Receiver for the site session; `None` until one is established.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    /// Establish an anonymous site session and publish it.
    async fn sign_in_anonymously(&self) -> Result<Session, CoreError>;

    /// Check admin credentials. The email must match exactly.
    async fn sign_in_admin(&self, email: &str, password: &str) -> Result<Session, CoreError>;
}

/// [`AuthProvider`] backed by the configured admin credential.
#[derive(Debug)]
pub struct LocalAuthProvider {
    admin: AdminConfig,
    session: watch::Sender<Option<Session>>,
}

impl LocalAuthProvider {
    pub fn new(admin: AdminConfig) -> Self {
        let (session, _) = watch::channel(None);
        Self { admin, session }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    async fn sign_in_anonymously(&self) -> Result<Session, CoreError> {
        let session = Session::Anonymous {
            id: Uuid::new_v4().to_string(),
        };
        self.session.send_replace(Some(session.clone()));
        tracing::debug!("Anonymous session established");
        Ok(session)
    }

    async fn sign_in_admin(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        let invalid = || CoreError::Unauthorized("Invalid email or password".into());

        if email != self.admin.email {
            tracing::warn!(email, "Login attempt for non-admin address");
            return Err(invalid());
        }
        let valid = verify_password(password, &self.admin.password_hash)
            .map_err(|e| CoreError::Internal(format!("Password verification error: {e}")))?;
        if !valid {
            return Err(invalid());
        }

        Ok(Session::Admin {
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::auth::password::hash_password;

    fn provider() -> LocalAuthProvider {
        LocalAuthProvider::new(AdminConfig {
            email: "artist@example.com".into(),
            password_hash: hash_password("s3cret-pass").unwrap(),
        })
    }

    #[tokio::test]
    async fn anonymous_sign_in_publishes_session() {
        let auth = provider();
        let mut sessions = auth.subscribe();
        assert!(sessions.borrow().is_none());

        auth.sign_in_anonymously().await.unwrap();
        sessions.changed().await.unwrap();
        assert_matches!(&*sessions.borrow(), Some(Session::Anonymous { .. }));
    }

    #[tokio::test]
    async fn admin_email_must_match_exactly() {
        let auth = provider();
        assert_matches!(
            auth.sign_in_admin("Artist@example.com", "s3cret-pass").await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            auth.sign_in_admin("artist@example.com", "wrong").await,
            Err(CoreError::Unauthorized(_))
        );
        assert_matches!(
            auth.sign_in_admin("artist@example.com", "s3cret-pass").await,
            Ok(Session::Admin { .. })
        );
        assert!(auth.subscribe().borrow().is_none(), "admin login leaves site session alone");
    }
}
