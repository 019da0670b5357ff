//! Account management.
//!
//! The very first account can be created without logging in, so a fresh
//! database can be bootstrapped; it must be an admin. After that only an
//! admin may add accounts.

use inventory_core::{Identity, UserRole};

use super::{CommandOutcome, CommandResult};
use crate::error::ApiError;
use crate::session::Session;

/// Creates an account and returns its identity.
pub async fn create_user(
    session: &Session,
    username: &str,
    password: &str,
    display_name: &str,
    role: UserRole,
) -> CommandResult<Identity> {
    let users = session.db().users();

    if users.count().await? == 0 {
        if role != UserRole::Admin {
            return Err(ApiError::validation(
                "The first account must have the admin role",
            ));
        }
    } else {
        session.require_admin("users add")?;
    }

    let record = users.create(username, password, display_name, role).await?;
    let identity = Identity::from(record);
    Ok(CommandOutcome::new(
        format!("User {} created ({})", identity.username, identity.role.as_str()),
        identity,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use crate::session::test_support::*;
    use inventory_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_bootstrap_first_admin() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = Session::with_database(db, AppConfig::default());

        let err = create_user(&session, "clerk", "long-enough", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let created = create_user(&session, "root", "long-enough", "", UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(created.data.display_name, "root");

        // From now on an admin login is needed.
        let err = create_user(&session, "clerk", "long-enough", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        session.login("root", "long-enough").await.unwrap();
        create_user(&session, "clerk", "long-enough", "Clerk", UserRole::Staff)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_staff_cannot_add_users_and_names_are_unique() {
        let mut staff = session().await;
        staff.login(STAFF, STAFF_PASSWORD).await.unwrap();
        let err = create_user(&staff, "intern", "long-enough", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccessDenied);

        let admin = admin_session().await;
        let err = create_user(&admin, STAFF, "long-enough", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConstraintViolation);

        let err = create_user(&admin, "intern", "short", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
