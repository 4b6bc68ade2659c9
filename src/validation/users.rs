use garde::Validate;
use serde::Deserialize;

use crate::models::user::Role;
use crate::validation::auth::{normalize_email, Normalize};

/// The request payload for a partial user update. Absent fields keep
/// their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[garde(inner(length(chars, min = 1, max = 100)))]
    pub name: Option<String>,
    #[garde(inner(email))]
    pub email: Option<String>,
    #[garde(inner(length(chars, min = 8, max = 128)))]
    pub password: Option<String>,
    /// Only admins may set this; enforced in the service layer.
    #[garde(skip)]
    pub role: Option<Role>,
}

impl Normalize for UpdateUserRequest {
    fn normalize(&mut self) {
        if let Some(ref mut name) = self.name {
            *name = name.trim().to_string();
        }
        if let Some(ref mut email) = self.email {
            *email = normalize_email(email);
        }
    }
}

/// Pagination parameters for the user list.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::auth::check;

    #[test]
    fn empty_update_is_valid() {
        let mut req = UpdateUserRequest {
            name: None,
            email: None,
            password: None,
            role: None,
        };
        assert!(check(&mut req).is_ok());
    }

    #[test]
    fn present_fields_are_still_constrained() {
        let mut req = UpdateUserRequest {
            name: None,
            email: Some("broken@".to_string()),
            password: None,
            role: None,
        };
        assert!(check(&mut req).is_err());

        let mut req = UpdateUserRequest {
            name: None,
            email: None,
            password: Some("short".to_string()),
            role: None,
        };
        assert!(check(&mut req).is_err());
    }

    #[test]
    fn email_is_normalized_before_validation() {
        let mut req = UpdateUserRequest {
            name: Some("  Grace Hopper ".to_string()),
            email: Some("Grace@Navy.MIL".to_string()),
            password: None,
            role: None,
        };

        check(&mut req).unwrap();
        assert_eq!(req.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(req.email.as_deref(), Some("grace@navy.mil"));
    }
}
