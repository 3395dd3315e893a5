use axum::extract::State;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{Plan, Role, Tenant, User};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public profile of the logged-in user. `tenant_id` carries the tenant
/// slug, which is how tenants are addressed by the API.
#[derive(Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub tenant_id: String,
}

impl UserProfile {
    fn new(user: &User, tenant: &Tenant) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role(),
            tenant_id: tenant.slug.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct TenantSummary {
    pub slug: String,
    pub name: String,
    pub plan: Plan,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: UserProfile,
    pub tenant: TenantSummary,
}

pub async fn login(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<LoginResponse>, AppError> {
    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let Some(user) = db::users::find_by_email(&state.pool, &req.email).await? else {
        state.login_limiter.record_failure(&req.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(&req.password, &user.password_hash)?;

    if !valid {
        state.login_limiter.record_failure(&req.email);
        tracing::info!(email = %req.email, "Rejected login");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }
    state.login_limiter.reset(&req.email);

    let tenant = db::tenants::find_by_id(&state.pool, user.tenant_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("User {} has no tenant", user.id)))?;

    let claims = Claims::new(
        user.id,
        user.tenant_id,
        user.role.clone(),
        state.config.token_ttl_minutes,
    );
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = %user.id, tenant = %tenant.slug, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::new(&user, &tenant),
    }))
}

pub async fn me(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MeResponse>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let tenant = db::tenants::find_by_id(&state.pool, auth.tenant_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found.".to_string()))?;

    Ok(Json(MeResponse {
        user: UserProfile::new(&user, &tenant),
        tenant: TenantSummary {
            slug: tenant.slug.clone(),
            name: tenant.name.clone(),
            plan: tenant.plan(),
        },
    }))
}
