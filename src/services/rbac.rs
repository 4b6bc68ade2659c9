//! Role-based access control as plain functions.
//!
//! Authorization is a pure decision from (required role, verified identity)
//! to allow/deny. Middleware and services call into here; nothing in this
//! module knows about HTTP.

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::session::AuthSession;
use crate::models::user::Role;

/// Checks that the session satisfies the declared required role.
///
/// Admins satisfy every requirement; a regular user only the `user` one.
pub fn authorize(required: Role, session: &AuthSession) -> Result<()> {
    match (required, session.role) {
        (_, Role::Admin) => Ok(()),
        (Role::User, Role::User) => Ok(()),
        (Role::Admin, Role::User) => Err(AppError::Unauthorized),
    }
}

/// Checks that the session may act on the given user record: the record
/// must be the session's own, or the session must be an admin.
pub fn authorize_self_or_admin(session: &AuthSession, target: Uuid) -> Result<()> {
    if session.role == Role::Admin || session.user_id == target {
        return Ok(());
    }
    Err(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session(role: Role) -> AuthSession {
        AuthSession {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            expires_at: Utc::now() + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn admin_satisfies_every_requirement() {
        let admin = session(Role::Admin);
        assert!(authorize(Role::User, &admin).is_ok());
        assert!(authorize(Role::Admin, &admin).is_ok());
    }

    #[test]
    fn user_is_denied_admin_operations() {
        let user = session(Role::User);
        assert!(authorize(Role::User, &user).is_ok());
        assert!(matches!(
            authorize(Role::Admin, &user),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn users_may_only_act_on_themselves() {
        let user = session(Role::User);
        assert!(authorize_self_or_admin(&user, user.user_id).is_ok());
        assert!(authorize_self_or_admin(&user, Uuid::new_v4()).is_err());
    }

    #[test]
    fn admins_may_act_on_anyone() {
        let admin = session(Role::Admin);
        assert!(authorize_self_or_admin(&admin, Uuid::new_v4()).is_ok());
    }
}
