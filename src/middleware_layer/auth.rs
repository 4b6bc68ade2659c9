use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::Utc;
use tower_cookies::Cookies;

use crate::{
    crypto::jwt,
    error::AppError,
    models::session::{AuthSession, SESSION_COOKIE},
    models::user::Role,
    services::rbac,
    state::AppState,
};

/// Extracts the raw session token from the request cookies.
fn extract_session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// A middleware that requires a valid session token.
///
/// On success the verified [`AuthSession`] is attached as a request
/// extension for downstream handlers. Every failure mode (missing cookie,
/// bad signature, expiry) yields the same structured 401 response.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(&cookies).ok_or_else(|| {
        tracing::debug!("❌ No session cookie on {}", request.uri().path());
        AppError::Authentication("Authentication required".to_string())
    })?;

    let claims = jwt::verify(&state.config.jwt_secret, &token)?;
    let session = AuthSession::try_from(claims)?;

    // `exp` was already validated by the decoder; this guards against a
    // claims payload whose timestamp decoded but lies in the past.
    if Utc::now() > session.expires_at {
        tracing::debug!("❌ Session expired for user: {}", session.user_id);
        return Err(AppError::Authentication(
            "Invalid or expired session token".to_string(),
        ));
    }

    tracing::debug!("✅ User authenticated: {}", session.user_id);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// A middleware that requires the authenticated session to hold the
/// `admin` role. Must be layered inside [`require_auth`].
pub async fn require_admin(
    Extension(session): Extension<AuthSession>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    rbac::authorize(Role::Admin, &session)?;

    tracing::debug!("✅ Admin access granted to {}", session.user_id);
    Ok(next.run(request).await)
}
