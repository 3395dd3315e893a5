use serde::{Deserialize, Deserializer, Serialize};

use super::api::ApiClient;
use super::error::ClientError;
use super::session::Session;

/// Opaque note identifier. The API may send it as a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => NoteId(s),
            Raw::Number(n) => NoteId(n.to_string()),
        })
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        NoteId(s.to_string())
    }
}

impl From<u64> for NoteId {
    fn from(n: u64) -> Self {
        NoteId(n.to_string())
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

/// Uncommitted input of the note-creation form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

impl NoteForm {
    /// The form only submits with both fields filled in.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

/// Note list, loading flag, error slot and note form of the dashboard.
#[derive(Debug, Default)]
pub struct NotesViewModel {
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
    pub form: NoteForm,
}

impl NotesViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn record_error(&mut self, err: &ClientError) {
        self.error = Some(err.to_string());
    }

    /// Drop everything tied to the previous session.
    pub fn reset(&mut self) {
        self.notes.clear();
        self.loading = false;
        self.error = None;
    }

    /// Replace the list with the server's. On failure the previous list
    /// stays. `loading` is cleared last whatever the outcome.
    pub async fn fetch_notes(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<(), ClientError> {
        self.error = None;
        self.loading = true;

        let result = api.list_notes(&session.token).await;
        let outcome = match result {
            Ok(notes) => {
                self.notes = notes;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        };

        self.loading = false;
        outcome
    }

    /// Create a note and put it at the head of the list. No refetch.
    pub async fn create_note(
        &mut self,
        api: &ApiClient,
        session: &Session,
        title: &str,
        content: &str,
    ) -> Result<Note, ClientError> {
        self.error = None;

        match api.create_note(&session.token, title, content).await {
            Ok(note) => {
                self.notes.insert(0, note.clone());
                self.form.clear();
                Ok(note)
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Submit the form buffer. Returns `Ok(None)` without a request when the
    /// form is incomplete.
    pub async fn submit_form(
        &mut self,
        api: &ApiClient,
        session: &Session,
    ) -> Result<Option<Note>, ClientError> {
        if !self.form.is_submittable() {
            return Ok(None);
        }
        let NoteForm { title, content } = self.form.clone();
        self.create_note(api, session, &title, &content)
            .await
            .map(Some)
    }

    /// Delete a note. The local entry goes only once the server confirms.
    pub async fn delete_note(
        &mut self,
        api: &ApiClient,
        session: &Session,
        id: &NoteId,
    ) -> Result<(), ClientError> {
        self.error = None;

        match api.delete_note(&session.token, id).await {
            Ok(()) => {
                self.notes.retain(|note| &note.id != id);
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }
}
