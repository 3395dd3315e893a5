use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::Serialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Plan;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn upgrade(
    auth: AuthUser,
    State(state): State<SharedState>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require_admin()?;

    let tenant = db::tenants::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found.".to_string()))?;

    if tenant.id != auth.tenant_id() {
        return Err(AppError::Forbidden(
            "Access denied: You can only upgrade your own tenant.".to_string(),
        ));
    }

    db::tenants::set_plan(&state.pool, tenant.id, Plan::Pro).await?;
    tracing::info!(tenant = %slug, user_id = %auth.user_id, "Tenant upgraded to Pro");

    Ok(Json(MessageResponse {
        message: format!("Tenant {slug} has been upgraded to Pro."),
    }))
}
