use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    crypto::{csrf, jwt},
    error::Result,
    models::session::{AuthSession, CSRF_COOKIE, SESSION_COOKIE},
    models::user::{PublicUser, User},
    services::auth as auth_service,
    state::AppState,
    validation::auth::{check, LoginRequest, RegisterRequest},
};

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

/// Creates a secure cookie with the given name, value, and max age.
///
/// Every cookie is HTTP-only except the CSRF one, which client scripts
/// must read to echo it back in the `x-csrf-token` header.
fn create_secure_cookie(
    name: &'static str,
    value: String,
    max_age_days: i64,
    is_production: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    if name != CSRF_COOKIE {
        cookie.set_http_only(true);
    }

    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");

    cookie
}

/// Mints a session token for the user and attaches the session and CSRF
/// cookies to the response.
///
/// The token travels only in the cookie, never in a response body. Its
/// cookie max-age equals the token's own expiry.
fn issue_session_cookies(state: &AppState, cookies: &Cookies, user: &User) -> Result<()> {
    let ttl = chrono::Duration::days(state.config.session_duration_days);
    let token = jwt::mint(&state.config.jwt_secret, user, ttl)?;

    cookies.add(create_secure_cookie(
        SESSION_COOKIE,
        token,
        state.config.session_duration_days,
        state.config.is_production(),
    ));

    let csrf_token = csrf::generate_csrf_token()?;
    cookies.add(create_secure_cookie(
        CSRF_COOKIE,
        csrf_token,
        state.config.session_duration_days,
        state.config.is_production(),
    ));

    tracing::debug!("🔑 Session and CSRF cookies issued for user {}", user.id);
    Ok(())
}

/// Removes a cookie set by [`issue_session_cookies`].
fn clear_cookie(cookies: &Cookies, name: &'static str) {
    let mut cookie = Cookie::new(name, "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Handles user registration.
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt: {}", payload.email);
    check(&mut payload)?;

    let user = auth_service::register_user(&state, payload).await?;
    issue_session_cookies(&state, &cookies, &user)?;

    tracing::info!("✅ User registered: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Registration successful. Welcome!".to_string(),
        user: Some(PublicUser::from(user)),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles user login.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt: {}", payload.email);
    check(&mut payload)?;

    let user = auth_service::authenticate_user(&state, payload).await?;
    issue_session_cookies(&state, &cookies, &user)?;

    tracing::info!("✅ User logged in: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: Some(PublicUser::from(user)),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user logout.
///
/// Sessions are stateless; logout clears the cookies and nothing else. A
/// token captured before logout stays valid until its natural expiry.
pub async fn logout(
    Extension(session): Extension<AuthSession>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", session.user_id);

    clear_cookie(&cookies, SESSION_COOKIE);
    clear_cookie(&cookies, CSRF_COOKIE);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
        user: None,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let cookie = create_secure_cookie(SESSION_COOKIE, "token".to_string(), 1, false);

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.same_site(),
            Some(tower_cookies::cookie::SameSite::Lax)
        );
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86400)));
        // Secure only in production so local HTTP development works.
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn session_cookie_is_secure_in_production() {
        let cookie = create_secure_cookie(SESSION_COOKIE, "token".to_string(), 1, true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn csrf_cookie_is_readable_by_scripts() {
        let cookie = create_secure_cookie(CSRF_COOKIE, "token".to_string(), 1, true);
        assert_ne!(cookie.http_only(), Some(true));
    }

    #[test]
    fn cookie_max_age_tracks_session_duration() {
        let cookie = create_secure_cookie(SESSION_COOKIE, "token".to_string(), 7, false);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(7 * 86400)));
    }
}
