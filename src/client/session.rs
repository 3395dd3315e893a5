use serde::{Deserialize, Serialize};

use super::api::{ApiClient, Credentials};
use super::error::{ClientError, StorageError};
use super::storage::Storage;
use crate::models::{Plan, Role};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub role: Role,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionUser {
    pub fn plan(&self) -> Plan {
        Plan::for_role(self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Owns the current session and mirrors it into durable storage.
pub struct SessionStore<S: Storage> {
    storage: S,
    session: Option<Session>,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted session. Both entries must be present and the
    /// user entry must decode, otherwise the store stays logged out.
    pub fn restore(&mut self) -> Option<&Session> {
        let token = self.storage.get(TOKEN_KEY);
        let user = self.storage.get(USER_KEY);

        self.session = match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<SessionUser>(&raw_user) {
                Ok(user) => Some(Session { token, user }),
                Err(e) => {
                    tracing::warn!("Ignoring stored session with unreadable user: {e}");
                    None
                }
            },
            _ => None,
        };

        self.session.as_ref()
    }

    /// Log in. A rejected attempt leaves any existing session as it was.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        credentials: &Credentials,
    ) -> Result<&Session, ClientError> {
        let session = api.login(credentials).await?;
        let stored = self.replace(session);
        tracing::info!(tenant = %stored.user.tenant_id, "Logged in");
        Ok(stored)
    }

    /// Re-read the user profile from the server, keeping the token.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<&Session, ClientError> {
        let token = match &self.session {
            Some(session) => session.token.clone(),
            None => return Err(ClientError::Unauthenticated),
        };

        let profile = api.me(&token).await?;
        Ok(self.replace(Session {
            token,
            user: profile.user,
        }))
    }

    /// Forget the session in memory and in storage. Never fails.
    pub fn logout(&mut self) {
        self.session = None;
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear stored session: {e}");
        }
    }

    /// Token and user are written as a pair; a partial write is rolled back.
    fn replace(&mut self, session: Session) -> &Session {
        if let Err(e) = self.persist(&session) {
            tracing::warn!("Session kept in memory only: {e}");
            let _ = self.storage.remove(TOKEN_KEY);
            let _ = self.storage.remove(USER_KEY);
        }
        self.session.insert(session)
    }

    fn persist(&mut self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(USER_KEY, &user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        Ok(())
    }
}
