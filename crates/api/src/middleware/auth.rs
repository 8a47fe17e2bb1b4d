//! JWT-based authentication extractor for Axum handlers.
//!
//! The caller identity is always an explicit extracted value threaded into
//! handlers, never ambient request-context state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use roomkey_core::error::CoreError;
use roomkey_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated member extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(member: AuthMember) -> AppResult<Json<()>> {
///     tracing::info!(member_id = member.member_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthMember {
    /// The member's internal database id (from `claims.sub`).
    pub member_id: DbId,
    /// The member's role name (`"admin"` or `"member"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthMember {
            member_id: claims.sub,
            role: claims.role,
        })
    }
}
