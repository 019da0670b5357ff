//! # User Repository
//!
//! Accounts allowed to sign in, and the credential check itself.
//!
//! ## Credential Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      authenticate(username, password)                   │
//! │                                                                         │
//! │  SELECT ... FROM users WHERE username = ?1                             │
//! │       │                                                                 │
//! │       ├── no row ───────────────────────────► None                     │
//! │       ▼                                                                 │
//! │  Argon2 verify(password, stored PHC string)                            │
//! │       │                                                                 │
//! │       ├── mismatch ─────────────────────────► None                     │
//! │       ▼                                                                 │
//! │  Some(Identity { username, display_name, role })                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Passwords are never stored or logged in clear text. "No such user" and
//! "wrong password" are indistinguishable to the caller.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use inventory_core::validation::{validate_password, validate_username};
use inventory_core::{CoreError, Identity, UserRecord, UserRole};

const USER_COLUMNS: &str = "id, username, password_hash, display_name, role, created_at";

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage (Argon2id, random salt, PHC string).
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string.
///
/// A stored value that is not a valid PHC string never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account.
    ///
    /// ## Errors
    /// - `Domain(Validation)` for an unusable username or a short password
    /// - `UniqueViolation` if the username is taken
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
        role: UserRole,
    ) -> DbResult<UserRecord> {
        validate_username(username).map_err(CoreError::from)?;
        validate_password(password).map_err(CoreError::from)?;

        let password_hash = hash_password(password)?;
        let display_name = if display_name.trim().is_empty() {
            username
        } else {
            display_name
        };

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (username, password_hash, display_name, role) \
             VALUES (?1, ?2, ?3, ?4) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(&password_hash)
        .bind(display_name)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(username))?;

        info!(username = %user.username, role = role.as_str(), "User created");
        Ok(user)
    }

    /// Looks up an account by its exact username.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Number of accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Checks a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(Identity))` - credentials match
    /// * `Ok(None)` - unknown user or wrong password
    /// * `Err(_)` - the store could not be read
    pub async fn authenticate(&self, username: &str, password: &str) -> DbResult<Option<Identity>> {
        let Some(user) = self.find_by_username(username).await? else {
            debug!(username = %username, "Login for unknown user");
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash) {
            debug!(username = %username, "Login with wrong password");
            return Ok(None);
        }

        Ok(Some(Identity::from(user)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();
        users
            .create("admin", "s3cret-pass", "Site Admin", UserRole::Admin)
            .await
            .unwrap();

        let identity = users
            .authenticate("admin", "s3cret-pass")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.display_name, "Site Admin");
        assert!(identity.is_admin());

        assert!(users.authenticate("admin", "wrong-pass").await.unwrap().is_none());
        assert!(users.authenticate("nobody", "s3cret-pass").await.unwrap().is_none());
        // Usernames are matched exactly.
        assert!(users.authenticate("Admin", "s3cret-pass").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_bad_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();
        let created = users
            .create("clerk", "password123", "", UserRole::Staff)
            .await
            .unwrap();
        assert_eq!(created.display_name, "clerk");
        assert_eq!(created.role, UserRole::Staff);
        assert_ne!(created.password_hash, "password123");

        let dup = users
            .create("clerk", "password456", "Other", UserRole::Admin)
            .await
            .unwrap_err();
        assert!(matches!(dup, DbError::UniqueViolation { .. }));

        let short = users
            .create("newbie", "short", "", UserRole::Staff)
            .await
            .unwrap_err();
        assert!(matches!(short, DbError::Domain(CoreError::Validation(_))));

        assert_eq!(users.count().await.unwrap(), 1);
    }
}
