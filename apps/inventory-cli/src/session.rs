//! # Session
//!
//! One authenticated context: the database handle, who is acting, and the
//! configuration. Every command receives it explicitly.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Session::open(config) ── connect with retry ──✗──► ConnectionFailure  │
//! │       │                                            (nothing else runs)  │
//! │       ▼                                                                 │
//! │  identity = None                                                       │
//! │       │                                                                 │
//! │  login(user, pw) ──✗──► InvalidCredentials, identity unchanged         │
//! │       │ ✓                                                               │
//! │       ▼                                                                 │
//! │  identity = Some(admin | staff)                                        │
//! │       │                                                                 │
//! │  commands ── require_admin() ──✗──► NotAuthenticated / AccessDenied    │
//! │       │                                                                 │
//! │  logout() ── closes the database handle                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use inventory_core::{CoreError, Identity, UserRole};
use inventory_db::Database;

use crate::config::AppConfig;
use crate::error::{ApiError, ErrorCode};

/// An open session.
#[derive(Debug)]
pub struct Session {
    db: Database,
    identity: Option<Identity>,
    config: AppConfig,
}

impl Session {
    /// Opens the database for a new, not yet authenticated session.
    ///
    /// Connection problems are retried per the configured policy; what is
    /// left after that is a `ConnectionFailure`.
    pub async fn open(config: AppConfig) -> Result<Session, ApiError> {
        let path = config.database_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                warn!(error = %e, dir = %parent.display(), "Cannot create data directory");
                ApiError::connection(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let db = Database::connect_with_retry(config.db_config())
            .await
            .map_err(|e| {
                warn!(error = %e, path = %path.display(), "Session could not open database");
                ApiError::connection(format!("Cannot open database {}: {}", path.display(), e))
            })?;

        info!(path = %path.display(), "Session opened");
        Ok(Session::with_database(db, config))
    }

    /// Wraps an already open database.
    pub fn with_database(db: Database, config: AppConfig) -> Session {
        Session {
            db,
            identity: None,
            config,
        }
    }

    /// Checks credentials and, on success, records the identity.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Identity, ApiError> {
        match self.db.users().authenticate(username, password).await? {
            Some(identity) => {
                info!(
                    username = %identity.username,
                    role = identity.role.as_str(),
                    "Login succeeded"
                );
                let identity = self.identity.insert(identity);
                Ok(&*identity)
            }
            None => {
                warn!(username = %username, "Login failed");
                Err(ApiError::invalid_credentials())
            }
        }
    }

    /// Ends the session and closes its database handle.
    pub async fn logout(self) {
        if let Some(identity) = &self.identity {
            info!(username = %identity.username, "Logout");
        }
        self.db.close().await;
    }

    /// The logged-in identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Requires a logged-in admin.
    ///
    /// ## Errors
    /// - `NotAuthenticated` before login
    /// - `AccessDenied` for any other role
    pub fn require_admin(&self, operation: &str) -> Result<&Identity, ApiError> {
        let identity = self.identity.as_ref().ok_or_else(|| {
            ApiError::new(ErrorCode::NotAuthenticated, "Please log in first")
        })?;

        if !identity.is_admin() {
            warn!(username = %identity.username, operation, "Access denied");
            return Err(CoreError::AccessDenied {
                operation: operation.to_string(),
                required: UserRole::Admin.as_str().to_string(),
            }
            .into());
        }

        Ok(identity)
    }

    /// The session's database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The session's configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use inventory_db::DbConfig;

    pub const ADMIN: &str = "admin";
    pub const ADMIN_PASSWORD: &str = "admin-password";
    pub const STAFF: &str = "clerk";
    pub const STAFF_PASSWORD: &str = "clerk-password";

    /// A session on a fresh in-memory database with one admin and one staff
    /// account, not logged in.
    pub async fn session() -> Session {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users()
            .create(ADMIN, ADMIN_PASSWORD, "Administrator", UserRole::Admin)
            .await
            .unwrap();
        db.users()
            .create(STAFF, STAFF_PASSWORD, "Clerk", UserRole::Staff)
            .await
            .unwrap();
        Session::with_database(db, AppConfig::default())
    }

    /// Same as [`session`], logged in as the admin.
    pub async fn admin_session() -> Session {
        let mut session = session().await;
        session.login(ADMIN, ADMIN_PASSWORD).await.unwrap();
        session
    }
}
