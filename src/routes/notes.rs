use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Note, Plan};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NoteInput {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Title and content are required".to_string(),
            ));
        }
        Ok(())
    }
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = db::notes::list(&state.pool, auth.tenant_id()).await?;
    Ok(Json(notes))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<NoteInput>, AppError>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    req.validate()?;

    // The tenant row lock serializes concurrent creates against the plan limit
    let mut tx = state.pool.begin().await?;
    let tenant = db::tenants::lock_by_id(&mut *tx, auth.tenant_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found.".to_string()))?;

    if tenant.plan() == Plan::Free {
        let limit = state.config.free_note_limit;
        let count = db::notes::count(&mut *tx, tenant.id).await?;
        if count >= limit {
            return Err(AppError::Forbidden(format!(
                "Free plan is limited to {limit} notes. Please upgrade."
            )));
        }
    }

    let note = db::notes::create(&mut *tx, tenant.id, auth.user_id, &req.title, &req.content)
        .await?;
    tx.commit().await?;

    tracing::debug!(note_id = %note.id, tenant = %tenant.slug, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Note>, AppError> {
    let note = db::notes::find_by_id(&state.pool, id, auth.tenant_id())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "Note not found or you do not have permission to view it.".to_string(),
            )
        })?;
    Ok(Json(note))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(req), _): WithRejection<Json<NoteInput>, AppError>,
) -> Result<Json<Note>, AppError> {
    req.validate()?;

    let note = db::notes::update(&state.pool, id, auth.tenant_id(), &req.title, &req.content)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "Note not found or you do not have permission to update it.".to_string(),
            )
        })?;
    Ok(Json(note))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<StatusCode, AppError> {
    if !db::notes::delete(&state.pool, id, auth.tenant_id()).await? {
        return Err(AppError::NotFound(
            "Note not found or you do not have permission to delete it.".to_string(),
        ));
    }

    tracing::debug!(note_id = %id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}
