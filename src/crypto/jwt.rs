use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::user::{Role, User};

/// The claims embedded in a session token.
///
/// Self-contained: once the signature and expiry have been verified, the
/// claims are the whole session. Nothing is looked up server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's ID.
    pub sub: String,
    /// The user's email address.
    pub email: String,
    /// The user's role at issue time.
    pub role: Role,
    /// Issued-at time (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,
}

/// Mints a signed session token for a user.
///
/// # Arguments
///
/// * `secret` - The server-held signing secret.
/// * `user` - The authenticated user.
/// * `ttl` - How long the token stays valid.
///
/// # Returns
///
/// A `Result` containing the encoded token.
pub fn mint(secret: &[u8], user: &User, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
}

/// Verifies a session token and returns its claims.
///
/// Signature and expiry are both checked; any failure collapses into a
/// single authentication error so callers cannot distinguish why a token
/// was rejected.
pub fn verify(secret: &[u8], token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::Authentication("Invalid or expired session token".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    const SECRET: &[u8] = b"unit-test-secret-0123456789abcdef";

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn mint_then_verify_round_trips_identity_and_role() {
        let user = sample_user(Role::Admin);
        let token = mint(SECRET, &user, Duration::days(1)).unwrap();

        let claims = verify(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = sample_user(Role::User);
        // Two hours past expiry, well beyond the default validation leeway.
        let token = mint(SECRET, &user, Duration::hours(-2)).unwrap();

        assert!(matches!(
            verify(SECRET, &token),
            Err(AppError::Authentication(_))
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = sample_user(Role::User);
        let token = mint(SECRET, &user, Duration::days(1)).unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(verify(SECRET, &tampered).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let user = sample_user(Role::User);
        let token = mint(b"some-other-secret-0123456789abcdef", &user, Duration::days(1)).unwrap();

        assert!(verify(SECRET, &token).is_err());
    }
}
