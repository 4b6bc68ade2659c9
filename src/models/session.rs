use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::jwt::Claims;
use crate::error::AppError;
use crate::models::user::Role;

/// The name of the HTTP-only cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "session_token";

/// The name of the script-readable cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrf_token";

/// The authenticated identity attached to a request after its session
/// token has been verified.
///
/// Built from verified [`Claims`] only; nothing in here is trusted before
/// the signature and expiry checks have passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The ID of the authenticated user.
    pub user_id: Uuid,
    /// The email the token was issued for.
    pub email: String,
    /// The role the token asserts.
    pub role: Role,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for AuthSession {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Authentication("Malformed session token".to_string()))?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| AppError::Authentication("Malformed session token".to_string()))?;

        Ok(AuthSession {
            user_id,
            email: claims.email,
            role: claims.role,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_with_valid_subject_become_a_session() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };

        let session = AuthSession::try_from(claims).unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn claims_with_garbage_subject_are_rejected() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::User,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        };

        assert!(matches!(
            AuthSession::try_from(claims),
            Err(AppError::Authentication(_))
        ));
    }
}
