use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use prep_core::model::AuthUser;
use storage::LocalStore;
use storage::local_store::AUTH_USER_KEY;

use crate::Clock;
use crate::error::{AuthError, SourceError};
use crate::question_api::QuestionApi;

/// Checks a username/password pair.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a rejected pair, or the
    /// underlying failure when the check itself could not run.
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError>;
}

/// Fixed list of accepted users, for offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }

    /// Parse `name:password,name:password`. Malformed entries are skipped.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let users = list
            .split(',')
            .filter_map(|entry| {
                let (name, password) = entry.trim().split_once(':')?;
                let name = name.trim();
                (!name.is_empty() && !password.is_empty())
                    .then(|| (name.to_string(), password.to_string()))
            })
            .collect();
        Self { users }
    }

    /// Read `PREP_USERS`; `None` when unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let list = std::env::var("PREP_USERS").ok()?;
        let credentials = Self::parse(&list);
        (!credentials.is_empty()).then_some(credentials)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticCredentials {
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.users.get(username) {
            Some(expected) if expected == password => Ok(()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

#[async_trait]
impl Authenticator for QuestionApi {
    async fn authenticate(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.login(username, password).await {
            Ok(()) => Ok(()),
            Err(SourceError::Rejected(_)) => Err(AuthError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }
}

/// Remembers who is logged in, for at most a day.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    store: LocalStore,
    authenticator: Arc<dyn Authenticator>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, store: LocalStore, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            clock,
            store,
            authenticator,
        }
    }

    /// Verify the credentials and remember the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` for blank input,
    /// `AuthError::InvalidCredentials` when rejected, and
    /// `AuthError::NotPersisted` when the login cannot be stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthUser, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if let Err(err) = self.authenticator.authenticate(username, password).await {
            tracing::warn!(username, error = %err, "login rejected");
            return Err(err);
        }

        let user = AuthUser::new(username, self.clock.now_millis());
        if !self.store.set(AUTH_USER_KEY, &user).await {
            return Err(AuthError::NotPersisted);
        }
        tracing::info!(username, "user logged in");
        Ok(user)
    }

    /// The remembered user, if the login is still fresh.
    ///
    /// Expired or unreadable records are removed.
    pub async fn current_user(&self) -> Option<AuthUser> {
        let Some(user) = self.store.get::<AuthUser>(AUTH_USER_KEY).await else {
            // absent or corrupt; either way nothing valid should linger
            self.store.remove(AUTH_USER_KEY).await;
            return None;
        };
        if user.is_expired(self.clock.now_millis()) {
            tracing::info!(username = %user.username, "login expired");
            self.store.remove(AUTH_USER_KEY).await;
            return None;
        }
        Some(user)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    pub async fn logout(&self) {
        self.store.remove(AUTH_USER_KEY).await;
    }
}
