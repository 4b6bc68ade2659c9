use garde::Validate;
use serde::Deserialize;

use crate::error::Result;

/// Payloads that canonicalize themselves (trim, lowercase) before
/// validation runs.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Normalizes then validates a payload, short-circuiting with a
/// field-level error list.
pub fn check<T>(payload: &mut T) -> Result<()>
where
    T: Validate<Context = ()> + Normalize,
{
    payload.normalize();
    payload.validate()?;
    Ok(())
}

/// Emails are compared and stored lowercase so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The request payload for user registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[garde(length(chars, min = 1, max = 100))]
    pub name: String,
    #[garde(email, length(max = 254))]
    pub email: String,
    #[garde(length(chars, min = 8, max = 128))]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

/// The request payload for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "difference engine".to_string(),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let mut req = valid_registration();
        assert!(check(&mut req).is_ok());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut req = valid_registration();
        req.email = "not-an-email".to_string();
        assert!(check(&mut req).is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut req = valid_registration();
        req.password = "short".to_string();
        assert!(check(&mut req).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut req = valid_registration();
        req.name = "   ".to_string();
        assert!(check(&mut req).is_err());
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        let mut req = valid_registration();
        req.name = "  Ada Lovelace  ".to_string();
        req.email = "  Ada@Example.COM ".to_string();

        check(&mut req).unwrap();
        assert_eq!(req.name, "Ada Lovelace");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn login_requires_a_password() {
        let mut req = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert!(check(&mut req).is_err());
    }

    #[test]
    fn validation_error_names_the_field() {
        let mut req = valid_registration();
        req.email = "nope".to_string();

        let err = check(&mut req).unwrap_err();
        match err {
            crate::error::AppError::Validation { details, .. } => {
                assert!(details.iter().any(|d| d.field == "email"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
