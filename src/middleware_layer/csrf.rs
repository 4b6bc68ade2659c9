use axum::{
    body::Body,
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::{crypto::csrf, error::AppError, models::session::CSRF_COOKIE};

/// The header clients echo the CSRF cookie back in.
const CSRF_HEADER: &str = "x-csrf-token";

/// A middleware that verifies the double-submit CSRF token.
///
/// The cookie value and the `x-csrf-token` header must match in constant
/// time. Safe methods are exempt; they must not mutate anything anyway.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
/// * `req` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn verify_csrf(cookies: Cookies, req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::GET
        || req.method() == Method::HEAD
        || req.method() == Method::OPTIONS
    {
        return next.run(req).await;
    }

    let csrf_cookie = match cookies.get(CSRF_COOKIE) {
        Some(c) => c.value().to_string(),
        None => {
            tracing::warn!("❌ CSRF: cookie missing");
            return AppError::Authentication("Missing CSRF token cookie".to_string())
                .into_response();
        }
    };

    let csrf_header = match req.headers().get(CSRF_HEADER) {
        Some(token) => match token.to_str() {
            Ok(t) => t.to_string(),
            Err(_) => {
                tracing::warn!("❌ CSRF: header is not valid UTF-8");
                return AppError::Authentication("Invalid CSRF token format".to_string())
                    .into_response();
            }
        },
        None => {
            tracing::warn!("❌ CSRF: header missing");
            return AppError::Authentication("Missing CSRF token header".to_string())
                .into_response();
        }
    };

    if !csrf::tokens_match(&csrf_cookie, &csrf_header) {
        tracing::warn!("❌ CSRF: token mismatch");
        return AppError::Authentication("CSRF token mismatch".to_string()).into_response();
    }

    next.run(req).await
}
