use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::{AuthError, Authenticator, Role, UserProfile};

struct StoredUser {
    profile: UserProfile,
    password_hash: String,
}

/// Users kept in memory, keyed by lowercased email.
///
/// Passwords are stored as Argon2id PHC strings.
#[derive(Clone, Default)]
pub struct InMemoryAuthenticator {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
}

impl InMemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a user's role.
    pub fn set_role(&self, uid: &str, role: Role) -> Result<UserProfile, AuthError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        let user = users
            .values_mut()
            .find(|user| user.profile.uid == uid)
            .ok_or_else(|| AuthError::UnknownUser(uid.to_string()))?;
        user.profile.role = role;
        debug!(uid, %role, "role changed");
        Ok(user.profile.clone())
    }
}

impl Authenticator for InMemoryAuthenticator {
    fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        let user = users
            .get(&normalize(email))
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user.profile.clone())
    }

    fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        let key = normalize(email);
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.contains_key(&key) {
            return Err(AuthError::AlreadyRegistered(email.to_string()));
        }

        let password_hash = hash_password(password)?;
        let uid = Uuid::new_v4().to_string();
        let profile = UserProfile {
            uid: uid.clone(),
            email: email.trim().to_string(),
            display_name: display_name.map(str::to_string),
            role: Role::Viewer,
        };
        users.insert(
            key,
            StoredUser {
                profile: profile.clone(),
                password_hash,
            },
        );
        debug!(%uid, "user registered");
        Ok(profile)
    }

    fn profile(&self, uid: &str) -> Result<UserProfile, AuthError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        users
            .values()
            .find(|user| user.profile.uid == uid)
            .map(|user| user.profile.clone())
            .ok_or_else(|| AuthError::UnknownUser(uid.to_string()))
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn poisoned() -> AuthError {
    AuthError::Storage("user table lock poisoned".into())
}
