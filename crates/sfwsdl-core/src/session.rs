//! API session input: the token and server instance of an already
//! authenticated Salesforce connection.
//!
//! Login is not handled here. The refresher only reads the two values
//! through [`SessionProvider`].

use thiserror::Error;

use crate::config::SessionConfig;

/// Environment variable overriding `[session] session_id`.
pub const SESSION_ID_ENV: &str = "SFWSDL_SESSION_ID";
/// Environment variable overriding `[session] server_instance`.
pub const SERVER_INSTANCE_ENV: &str = "SFWSDL_SERVER_INSTANCE";

/// Read-only access to an active session.
pub trait SessionProvider {
    fn session_id(&self) -> &str;
    fn server_instance(&self) -> &str;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session id (set SFWSDL_SESSION_ID or [session] session_id in config)")]
    MissingSessionId,
    #[error("no server instance (set SFWSDL_SERVER_INSTANCE or [session] server_instance in config)")]
    MissingServerInstance,
    #[error("server instance {0:?} is not a valid host label")]
    InvalidServerInstance(String),
}

/// A session token plus the instance (subdomain) it belongs to, e.g. `na1`.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    session_id: String,
    server_instance: String,
}

impl Session {
    pub fn new(
        session_id: impl Into<String>,
        server_instance: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let session = Self {
            session_id: session_id.into().trim().to_string(),
            server_instance: server_instance.into().trim().to_ascii_lowercase(),
        };
        validate(&session)?;
        Ok(session)
    }

    /// Build a session from the config section, letting `env` override each field.
    ///
    /// `env` is usually `|k| std::env::var(k).ok()`.
    pub fn resolve<F>(config: Option<&SessionConfig>, env: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, from_config: Option<&String>| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| from_config.cloned())
                .unwrap_or_default()
        };
        let session_id = pick(SESSION_ID_ENV, config.and_then(|c| c.session_id.as_ref()));
        let server_instance = pick(
            SERVER_INSTANCE_ENV,
            config.and_then(|c| c.server_instance.as_ref()),
        );
        Self::new(session_id, server_instance)
    }
}

impl SessionProvider for Session {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn server_instance(&self) -> &str {
        &self.server_instance
    }
}

// Keep the token out of logs and panics.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"<redacted>")
            .field("server_instance", &self.server_instance)
            .finish()
    }
}

/// Check the values exposed by any provider before they are used to build a request.
pub fn validate(session: &dyn SessionProvider) -> Result<(), SessionError> {
    if session.session_id().is_empty() {
        return Err(SessionError::MissingSessionId);
    }
    let instance = session.server_instance();
    if instance.is_empty() {
        return Err(SessionError::MissingServerInstance);
    }
    if !is_host_label(instance) {
        return Err(SessionError::InvalidServerInstance(instance.to_string()));
    }
    Ok(())
}

/// A single DNS label: 1-63 ASCII alphanumerics or `-`, no leading/trailing `-`.
fn is_host_label(s: &str) -> bool {
    s.len() <= 63
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn new_trims_and_lowercases_instance() {
        let s = Session::new(" tok ", " NA1 ").unwrap();
        assert_eq!(s.session_id(), "tok");
        assert_eq!(s.server_instance(), "na1");
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert_eq!(Session::new("", "na1"), Err(SessionError::MissingSessionId));
        assert_eq!(
            Session::new("tok", "  "),
            Err(SessionError::MissingServerInstance)
        );
    }

    #[test]
    fn instance_must_be_a_single_label() {
        for bad in ["evil.com/x", "na1.example", "-na1", "na1-", "na 1", "na1:443"] {
            assert!(
                matches!(
                    Session::new("tok", bad),
                    Err(SessionError::InvalidServerInstance(_))
                ),
                "{bad} should be rejected"
            );
        }
        assert!(Session::new("tok", "cs42-dev").is_ok());
    }

    #[test]
    fn resolve_from_config() {
        let cfg = SessionConfig {
            session_id: Some("00Dx!abc".to_string()),
            server_instance: Some("eu5".to_string()),
        };
        let s = Session::resolve(Some(&cfg), no_env).unwrap();
        assert_eq!(s.session_id(), "00Dx!abc");
        assert_eq!(s.server_instance(), "eu5");
    }

    #[test]
    fn env_overrides_config() {
        let cfg = SessionConfig {
            session_id: Some("from-config".to_string()),
            server_instance: Some("eu5".to_string()),
        };
        let env: HashMap<&str, &str> = [(SESSION_ID_ENV, "from-env"), (SERVER_INSTANCE_ENV, "")]
            .into_iter()
            .collect();
        let s = Session::resolve(Some(&cfg), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.session_id(), "from-env");
        // Blank env values fall back to config.
        assert_eq!(s.server_instance(), "eu5");
    }

    #[test]
    fn resolve_without_any_source_fails() {
        assert_eq!(
            Session::resolve(None, no_env),
            Err(SessionError::MissingSessionId)
        );
    }

    #[test]
    fn debug_redacts_token() {
        let s = Session::new("secret-token", "na1").unwrap();
        let dbg = format!("{:?}", s);
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("na1"));
    }
}
