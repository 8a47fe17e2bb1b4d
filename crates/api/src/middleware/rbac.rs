//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthMember`] and rejects requests whose role does
//! not meet the minimum requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use roomkey_core::error::CoreError;
use roomkey_core::roles::ROLE_ADMIN;

use super::auth::AuthMember;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(member): RequireAdmin) -> AppResult<Json<()>> {
///     // member is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthMember);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = AuthMember::from_request_parts(parts, state).await?;
        if member.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(member))
    }
}

/// Requires any authenticated member (any valid role).
///
/// Functionally equivalent to [`AuthMember`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthMember);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let member = AuthMember::from_request_parts(parts, state).await?;
        Ok(RequireAuth(member))
    }
}
