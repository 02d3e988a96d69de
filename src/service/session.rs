//! Session variables from the request context.

use std::collections::HashMap;

/// Header carrying `Bearer <token>` for a signed-in caller.
pub const AUTHORIZATION_HEADER: &str = "authorization";

/// Parsed session variables from the incoming request.
///
/// Over HTTP these are the request headers, lowercased:
///
/// ```json
/// {
///   "authorization": "Bearer 5f0c...e1",
///   "content-type": "application/json"
/// }
/// ```
///
/// The session only carries what the caller sent. Who the caller is, and
/// which role they hold, is resolved from the token on the server.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session presenting a token issued by `auth.login`.
    pub fn with_token(token: impl AsRef<str>) -> Self {
        let mut session = Self::new();
        session.set(AUTHORIZATION_HEADER, format!("Bearer {}", token.as_ref()));
        session
    }

    /// The bearer token, if the caller sent one.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.get(AUTHORIZATION_HEADER)?.trim();
        let (scheme, token) = value.split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session() {
        let session = Session::new();
        assert_eq!(session.bearer_token(), None);
        assert!(!session.has("anything"));
    }

    #[test]
    fn bearer_token_from_headers() {
        let mut vars = HashMap::new();
        vars.insert(AUTHORIZATION_HEADER.to_string(), "bearer abc123".to_string());
        let session = Session::from_map(vars);
        assert_eq!(session.bearer_token(), Some("abc123"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut session = Session::new();
        session.set(AUTHORIZATION_HEADER, "Basic YW5hOnNlY3JldG8=");
        assert_eq!(session.bearer_token(), None);

        session.set(AUTHORIZATION_HEADER, "Bearer   ");
        assert_eq!(session.bearer_token(), None);
    }

    #[test]
    fn with_token() {
        let session = Session::with_token("t1");
        assert_eq!(session.get(AUTHORIZATION_HEADER), Some("Bearer t1"));
        assert_eq!(session.bearer_token(), Some("t1"));
    }
}
