use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub tenant_id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
