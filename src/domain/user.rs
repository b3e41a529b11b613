//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "USER_ROLE")]
    User,
    #[serde(rename = "ADMIN_ROLE")]
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::User => ROLE_USER,
        }
    }

    /// Resolve a requested role: blank defaults to `User`, unknown values
    /// are rejected.
    pub fn validate(requested: Option<&str>) -> AppResult<Self> {
        match requested.map(str::trim) {
            None | Some("") => Ok(UserRole::User),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(UserRole::User),
            ROLE_ADMIN => Ok(UserRole::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role. Valid roles are: {}, {}",
                ROLE_USER, ROLE_ADMIN
            ))),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Password hash, never serialized
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,
    pub role: UserRole,
    pub status: bool,
    pub email_validated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Drop the password hash before the user leaves the auth boundary
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }
}

/// Fully resolved row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already hashed
    pub password: Option<String>,
    pub img: Option<String>,
    pub role: UserRole,
    pub status: bool,
    pub email_validated: bool,
}

/// User creation input
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    /// Plaintext, hashed by the service
    pub password: Option<String>,
    /// Raw role value, validated by the service
    pub role: Option<String>,
}

/// User update input as received from callers.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    /// Plaintext, hashed by the service
    pub password: Option<String>,
    pub img: Option<String>,
    pub role: Option<String>,
    pub status: Option<bool>,
    pub email_validated: Option<bool>,
}

/// Sparse set of column changes applied by the repository.
///
/// Each updatable column is a field; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    /// Already hashed
    pub password: Option<String>,
    pub img: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<bool>,
    pub email_validated: Option<bool>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.password.is_none()
            && self.img.is_none()
            && self.role.is_none()
            && self.status.is_none()
            && self.email_validated.is_none()
    }

    /// Soft delete: flip the account to disabled
    pub fn disable() -> Self {
        Self {
            status: Some(false),
            ..Self::default()
        }
    }
}

/// Bootstrap administrator settings
#[derive(Clone, Default)]
pub struct AdminBootstrap {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
}

// Don't expose the password in debug output
impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_role_defaults_to_user() {
        assert_eq!(UserRole::validate(None).unwrap(), UserRole::User);
        assert_eq!(UserRole::validate(Some("")).unwrap(), UserRole::User);
        assert_eq!(UserRole::validate(Some("  ")).unwrap(), UserRole::User);
    }

    #[test]
    fn test_validate_role_accepts_known_values() {
        assert_eq!(
            UserRole::validate(Some("ADMIN_ROLE")).unwrap(),
            UserRole::Admin
        );
        assert_eq!(UserRole::validate(Some("USER_ROLE")).unwrap(), UserRole::User);
    }

    #[test]
    fn test_validate_role_rejects_unknown() {
        let err = UserRole::validate(Some("SUPERUSER")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_role_serializes_as_stored_value() {
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"ADMIN_ROLE\""
        );
        assert_eq!(UserRole::User.to_string(), "USER_ROLE");
    }

    #[test]
    fn test_password_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "ANA".into(),
            email: "ana@example.com".into(),
            password: Some("$2b$12$hash".into()),
            img: None,
            role: UserRole::User,
            status: true,
            email_validated: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(user.without_password().password.is_none());
    }

    #[test]
    fn test_changes_emptiness() {
        assert!(UserChanges::default().is_empty());
        assert!(!UserChanges::disable().is_empty());
        assert!(!UserChanges {
            email_validated: Some(false),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_admin_bootstrap_debug_redacts_password() {
        let admin = AdminBootstrap {
            email: "root@example.com".into(),
            name: "Root".into(),
            password: Some("S3cret!pass".into()),
        };
        assert!(!format!("{:?}", admin).contains("S3cret"));
    }
}
