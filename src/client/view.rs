use askama::Template;

use super::notes::{Note, NoteForm, NotesViewModel};
use super::session::Session;
use super::LoginForm;
use crate::models::{Plan, Role};

#[derive(Debug, Clone, PartialEq)]
pub struct LoginView {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub role: Role,
    pub tenant_id: String,
    pub plan: Plan,
    pub can_upgrade: bool,
    pub notes: Vec<Note>,
    pub loading: bool,
    pub error: Option<String>,
    pub form: NoteForm,
}

impl DashboardView {
    /// Header line, e.g. `Admin | acme`.
    pub fn identity(&self) -> String {
        format!("{} | {}", self.role, self.tenant_id)
    }
}

/// What the client shows. Chosen only by whether a session exists.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Login(LoginView),
    Dashboard(DashboardView),
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    email: &'a str,
    error: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    identity: String,
    plan: &'a str,
    tenant_id: &'a str,
    can_upgrade: bool,
    notes: &'a [Note],
    loading: bool,
    error: Option<&'a str>,
    form: &'a NoteForm,
    can_submit: bool,
}

impl View {
    pub fn build(session: Option<&Session>, notes: &NotesViewModel, login_form: &LoginForm) -> View {
        let error = notes.error().map(str::to_string);

        match session {
            None => View::Login(LoginView {
                email: login_form.email.clone(),
                error,
            }),
            Some(session) => View::Dashboard(DashboardView {
                role: session.user.role,
                tenant_id: session.user.tenant_id.clone(),
                plan: session.user.plan(),
                can_upgrade: session.user.is_admin(),
                notes: notes.notes().to_vec(),
                loading: notes.is_loading(),
                error,
                form: notes.form.clone(),
            }),
        }
    }

    pub fn render(&self) -> Result<String, askama::Error> {
        match self {
            View::Login(view) => LoginTemplate {
                email: &view.email,
                error: view.error.as_deref(),
            }
            .render(),
            View::Dashboard(view) => DashboardTemplate {
                identity: view.identity(),
                plan: view.plan.as_str(),
                tenant_id: &view.tenant_id,
                can_upgrade: view.can_upgrade,
                notes: &view.notes,
                loading: view.loading,
                error: view.error.as_deref(),
                form: &view.form,
                can_submit: view.form.is_submittable(),
            }
            .render(),
        }
    }
}
