use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::auth::jwt::{self, TokenError};
use crate::error::AppError;
use crate::models::Role;
use crate::state::SharedState;

/// Caller identity decoded from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Access denied: Admin role required.".to_string(),
            ))
        }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::Unauthorized("Authorization token is missing!".to_string())
                    } else {
                        AppError::Unauthorized("Invalid token".to_string())
                    }
                })?;

        let claims = jwt::decode_token(bearer.token(), &state.config.jwt_secret).map_err(
            |e| match e {
                TokenError::Expired => AppError::Unauthorized("Token has expired".to_string()),
                TokenError::Invalid(reason) => {
                    tracing::debug!("Rejected bearer token: {reason}");
                    AppError::Unauthorized("Invalid token".to_string())
                }
            },
        )?;

        let role = Role::parse(&claims.role)
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
            tenant_id: claims.tid,
            role,
        })
    }
}
