//! Authentication extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::db as auth_db;
use super::session::SESSION_COOKIE_NAME;
use super::user::User;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated request context.
/// Add this as a handler parameter to require a live session; rejects with
/// 401 when the cookie is missing, unknown or expired.
#[derive(Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let conn = db::try_lock(&state.db)?;
        let user = auth_db::get_session_user(&conn, &session_id)?.ok_or(ApiError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}

/// Optional authentication extractor.
/// Returns Some(CurrentUser) if a live session exists, None otherwise.
/// Use for endpoints that work both with and without authentication.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(auth) => Ok(OptionalAuth(Some(auth))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
