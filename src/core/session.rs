use crate::utils::error::{LookupError, Result};
use std::collections::HashMap;

/// Proof of a successful login. Batch processing requires a `Session`
/// value, and the only way to obtain one is `Session::login`.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
}

impl Session {
    /// Check a username/password pair against the configured credential
    /// map.
    pub fn login(
        credentials: &HashMap<String, String>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        match credentials.get(username) {
            Some(expected) if expected == password => {
                tracing::info!("🔓 Login successful for {}", username);
                Ok(Self {
                    username: username.to_string(),
                })
            }
            _ => Err(LookupError::AuthError {
                message: "invalid username or password".to_string(),
            }),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("alice".to_string(), "s3cret".to_string());
        map
    }

    #[test]
    fn test_login_accepts_configured_pair() {
        let session = Session::login(&credentials(), "alice", "s3cret").unwrap();
        assert_eq!(session.username(), "alice");
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let result = Session::login(&credentials(), "alice", "wrong");
        assert!(matches!(result, Err(LookupError::AuthError { .. })));
    }

    #[test]
    fn test_login_rejects_unknown_user() {
        let result = Session::login(&credentials(), "mallory", "s3cret");
        assert!(matches!(result, Err(LookupError::AuthError { .. })));
    }
}
