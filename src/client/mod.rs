//! Notes client: a session store mirrored into durable storage, a notes
//! view-model driven through the API client, and HTML views of both.

pub mod api;
pub mod error;
pub mod notes;
pub mod session;
pub mod storage;
pub mod view;

pub use api::{ApiClient, Credentials};
pub use error::{ClientError, StorageError};
pub use notes::{Note, NoteForm, NoteId, NotesViewModel};
pub use session::{Session, SessionStore, SessionUser};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use view::View;

use crate::config::ClientConfig;

/// Uncommitted input of the login form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
    }
}

/// The client as a whole. Owns the session and hands it to the notes
/// view-model for every authenticated call.
///
/// Every action clears the previous error before running and records its
/// own failure in the shared error slot; the returned `Result` carries the
/// same failure for callers that want it.
pub struct NotesApp<S: Storage> {
    api: ApiClient,
    session: SessionStore<S>,
    notes: NotesViewModel,
    pub login_form: LoginForm,
}

impl NotesApp<FileStorage> {
    /// Build the client from `NOTES_API_URL` and `NOTES_SESSION_FILE`,
    /// reading `.env` when present.
    pub fn from_env() -> Result<Self, ClientError> {
        let _ = dotenvy::dotenv();
        let config = ClientConfig::from_env().map_err(ClientError::Config)?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let storage = FileStorage::open(&config.session_file)?;
        Ok(Self::new(ApiClient::new(&config.api_url), storage))
    }
}

impl<S: Storage> NotesApp<S> {
    pub fn new(api: ApiClient, storage: S) -> Self {
        Self {
            api,
            session: SessionStore::new(storage),
            notes: NotesViewModel::new(),
            login_form: LoginForm::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.session()
    }

    pub fn session_store(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn notes(&self) -> &NotesViewModel {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NotesViewModel {
        &mut self.notes
    }

    pub fn error(&self) -> Option<&str> {
        self.notes.error()
    }

    /// Restore the persisted session and, when there is one, load notes.
    pub async fn start(&mut self) {
        if self.session.restore().is_some() {
            let _ = self.fetch_notes().await;
        }
    }

    /// Log in with the login form and load notes. The form is cleared on
    /// success and kept on failure.
    pub async fn login(&mut self) -> Result<(), ClientError> {
        let credentials = self.login_form.credentials();
        self.login_with(&credentials).await?;
        self.login_form.clear();
        Ok(())
    }

    pub async fn login_with(&mut self, credentials: &Credentials) -> Result<(), ClientError> {
        self.notes.clear_error();

        if let Err(e) = self.session.login(&self.api, credentials).await {
            self.notes.record_error(&e);
            return Err(e);
        }

        // Notes of a previous session must not survive into the new one
        self.notes.reset();
        let _ = self.fetch_notes().await;
        Ok(())
    }

    /// Local only: session, storage, notes and error are all dropped.
    pub fn logout(&mut self) {
        self.session.logout();
        self.notes.reset();
    }

    pub async fn fetch_notes(&mut self) -> Result<(), ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        self.notes.fetch_notes(&self.api, session).await
    }

    pub async fn create_note(&mut self, title: &str, content: &str) -> Result<Note, ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        self.notes.create_note(&self.api, session, title, content).await
    }

    /// Submit the note form; `Ok(None)` when the form is incomplete.
    pub async fn submit_note(&mut self) -> Result<Option<Note>, ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        self.notes.submit_form(&self.api, session).await
    }

    pub async fn delete_note(&mut self, id: &NoteId) -> Result<(), ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        self.notes.delete_note(&self.api, session, id).await
    }

    /// Upgrade a tenant to Pro, then refresh the session and notes so the
    /// new plan is reflected.
    pub async fn upgrade_tenant(&mut self, slug: &str) -> Result<(), ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        self.notes.clear_error();

        let token = session.token.clone();
        match self.api.upgrade_tenant(&token, slug).await {
            Ok(message) => {
                tracing::info!(tenant = slug, "{}", message.as_deref().unwrap_or("Tenant upgraded"));
            }
            Err(e) => {
                self.notes.record_error(&e);
                return Err(e);
            }
        }

        if let Err(e) = self.session.refresh(&self.api).await {
            self.notes.record_error(&e);
            return Err(e);
        }
        self.fetch_notes().await
    }

    /// Upgrade the tenant of the current session.
    pub async fn upgrade_own_tenant(&mut self) -> Result<(), ClientError> {
        let Some(session) = self.session.session() else {
            return self.unauthenticated();
        };
        let slug = session.user.tenant_id.clone();
        self.upgrade_tenant(&slug).await
    }

    pub fn view(&self) -> View {
        View::build(self.session.session(), &self.notes, &self.login_form)
    }

    fn unauthenticated<T>(&mut self) -> Result<T, ClientError> {
        let err = ClientError::Unauthenticated;
        self.notes.record_error(&err);
        Err(err)
    }
}
