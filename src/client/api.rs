//! Typed HTTP client for the notes API.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ClientError, GENERIC_ERROR};
use super::notes::{Note, NoteId};
use super::session::{Session, SessionUser};
use crate::models::Plan;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct NewNote<'a> {
    title: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenantInfo {
    pub slug: String,
    pub name: String,
    pub plan: Plan,
}

/// Body of `GET /me`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub user: SessionUser,
    #[serde(default)]
    pub tenant: Option<TenantInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Whether the backend answers its liveness probe.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    /// Exchange credentials for a session. Rejections come back as
    /// `ClientError::Auth` carrying the server's message.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ClientError::Auth(error_message(resp).await));
        }

        read_json(resp).await
    }

    pub async fn me(&self, token: &str) -> Result<Profile, ClientError> {
        let resp = self
            .client
            .get(self.url("/me"))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(check(resp).await?).await
    }

    pub async fn list_notes(&self, token: &str) -> Result<Vec<Note>, ClientError> {
        let resp = self
            .client
            .get(self.url("/notes"))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(check(resp).await?).await
    }

    pub async fn create_note(
        &self,
        token: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, ClientError> {
        let resp = self
            .client
            .post(self.url("/notes"))
            .bearer_auth(token)
            .json(&NewNote { title, content })
            .send()
            .await?;
        read_json(check(resp).await?).await
    }

    pub async fn delete_note(&self, token: &str, id: &NoteId) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url(&format!("/notes/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Returns the server's confirmation message, if any.
    pub async fn upgrade_tenant(
        &self,
        token: &str,
        slug: &str,
    ) -> Result<Option<String>, ClientError> {
        let resp = self
            .client
            .post(self.url(&format!("/tenants/{slug}/upgrade")))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = check(resp).await?;

        // Body is informational only
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message))
    }
}

/// Turn a non-2xx response into `ClientError::Api`.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = error_message(resp).await;
    tracing::debug!(status = status.as_u16(), "API call failed: {message}");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    resp.json::<T>()
        .await
        .map_err(|e| ClientError::Network(format!("Invalid response from server: {e}")))
}

async fn error_message(resp: reqwest::Response) -> String {
    match resp.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        _ => GENERIC_ERROR.to_string(),
    }
}
