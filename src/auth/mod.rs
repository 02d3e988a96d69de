//! Users, roles and the login seam.
//!
//! An `Authenticator` checks credentials and owns the user directory.
//! `SessionTokens` maps the bearer tokens handed out at login back to user
//! ids, so the role is looked up on every request instead of trusted from
//! the caller.

mod in_memory;
mod password;
mod tokens;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use in_memory::InMemoryAuthenticator;
pub use password::{hash_password, verify_password};
pub use tokens::SessionTokens;

/// What a signed-in user may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Viewer,
}

impl Role {
    /// Admins edit records and lending state; viewers only read.
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "viewer" => Ok(Role::Viewer),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{0} is already registered")]
    AlreadyRegistered(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("auth storage error: {0}")]
    Storage(String),
}

/// Credential check and user directory.
pub trait Authenticator: Send + Sync {
    fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError>;

    /// Create an account. New users start as viewers.
    fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError>;

    fn profile(&self, uid: &str) -> Result<UserProfile, AuthError>;
}
