//! Opaque session tokens issued at login.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use tracing::debug;

use super::AuthError;

/// Maps bearer tokens to user ids. Tokens live until revoked.
#[derive(Clone, Default)]
pub struct SessionTokens {
    tokens: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh 256-bit token for `uid`.
    pub fn issue(&self, uid: &str) -> Result<String, AuthError> {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.tokens
            .write()
            .map_err(|_| poisoned())?
            .insert(token.clone(), uid.to_string());
        debug!(uid, "session token issued");
        Ok(token)
    }

    /// The user a token belongs to, if it is still valid.
    pub fn resolve(&self, token: &str) -> Result<Option<String>, AuthError> {
        let tokens = self.tokens.read().map_err(|_| poisoned())?;
        Ok(tokens.get(token).cloned())
    }

    /// Invalidate a token. Returns whether it was known.
    pub fn revoke(&self, token: &str) -> Result<bool, AuthError> {
        let removed = self.tokens.write().map_err(|_| poisoned())?.remove(token);
        Ok(removed.is_some())
    }
}

fn poisoned() -> AuthError {
    AuthError::Storage("session token table lock poisoned".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_resolve_revoke() {
        let tokens = SessionTokens::new();
        let token = tokens.issue("u1").unwrap();
        assert_eq!(token.len(), 64);
        assert_eq!(tokens.resolve(&token).unwrap().as_deref(), Some("u1"));

        assert!(tokens.revoke(&token).unwrap());
        assert_eq!(tokens.resolve(&token).unwrap(), None);
        assert!(!tokens.revoke(&token).unwrap());
    }

    #[test]
    fn tokens_are_unique() {
        let tokens = SessionTokens::new();
        assert_ne!(tokens.issue("u1").unwrap(), tokens.issue("u1").unwrap());
    }
}
