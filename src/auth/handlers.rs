//! Handlers for signup, login, logout and session check.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::db as auth_db;
use super::middleware::{CurrentUser, OptionalAuth};
use super::session::{SESSION_COOKIE_NAME, generate_session_id};
use super::user::User;
use crate::config;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;

/// Session duration in hours (1 week)
const SESSION_DURATION_HOURS: i64 = 24 * 7;

/// Request body for signup and login
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /signup - create an account and return its public view.
///
/// Does not establish a session; the client logs in afterwards.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Response, ApiError> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let mut user = User::new(body.username);
    user.set_password(&body.password)
        .map_err(ApiError::PasswordHash)?;

    let conn = db::try_lock(&state.db)?;
    user.id = auth_db::create_user(&conn, &user).map_err(|e| {
        if auth_db::is_unique_violation(&e) {
            ApiError::Conflict("username is already taken".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;
    drop(conn);

    tracing::info!("created user {} (id {})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(user.view())).into_response())
}

/// POST /login - verify credentials and establish a session.
///
/// Unknown usernames and wrong passwords produce identical responses, so the
/// caller cannot tell which part was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<Credentials>,
) -> Result<Response, ApiError> {
    let conn = db::try_lock(&state.db)?;

    let user = match auth_db::get_user_by_username(&conn, &body.username)? {
        Some(user) if user.verify_password(&body.password) => user,
        _ => {
            tracing::info!("failed login attempt for {:?}", body.username);
            return Err(ApiError::InvalidCredentials);
        }
    };

    // Update last login time (log but don't fail on error)
    if let Err(e) = auth_db::update_last_login(&conn, user.id) {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // Sweep expired sessions occasionally (~10% of logins)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
        match auth_db::cleanup_expired_sessions(&conn) {
            Ok(0) => {}
            Ok(n) => tracing::debug!("cleaned up {} expired sessions", n),
            Err(e) => tracing::warn!("Failed to clean up expired sessions: {}", e),
        }
    }

    let session_id = generate_session_id();
    auth_db::create_session(&conn, user.id, &session_id, SESSION_DURATION_HOURS)?;
    drop(conn);

    tracing::info!("user {} logged in", user.username);

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .secure(false) // Set to true in production with HTTPS
        .max_age(time::Duration::hours(SESSION_DURATION_HOURS))
        .build();

    Ok((jar.add(session_cookie), Json(user.view())).into_response())
}

/// DELETE /logout - clear the session.
///
/// Idempotent: succeeds with 204 whether or not a session existed.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE_NAME) {
        let session_id = session_cookie.value().to_string();
        if let Ok(conn) = state.db.lock() {
            if let Err(e) = auth_db::delete_session(&conn, &session_id) {
                tracing::warn!("Failed to delete session during logout: {}", e);
            }
        }
    }

    let removal = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();

    (jar.remove(removal), StatusCode::NO_CONTENT)
}

/// GET /check_session - return the current user, or 204 when nobody is
/// logged in. An absent session is a valid "no identity" result, not an
/// error.
pub async fn check_session(OptionalAuth(auth): OptionalAuth) -> Response {
    match auth {
        Some(CurrentUser(user)) => (StatusCode::OK, Json(user.view())).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
