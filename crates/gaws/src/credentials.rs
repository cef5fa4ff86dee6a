//! Static AWS credentials

use secrecy::{ExposeSecret, SecretString};

/// An access key pair, with an optional session token.
///
/// The secret parts are held in [`SecretString`] and never show up in
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: SecretString,
    session_token: Option<SecretString>,
}

impl Credentials {
    /// Create credentials from an access key pair.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into().into_boxed_str()),
            session_token: None,
        }
    }

    /// Attach a session token, as issued with temporary credentials.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::new(session_token.into().into_boxed_str()));
        self
    }

    /// Load credentials from the standard AWS environment variables.
    ///
    /// This will look for:
    /// - `AWS_ACCESS_KEY_ID`
    /// - `AWS_SECRET_ACCESS_KEY`
    /// - `AWS_SESSION_TOKEN` (optional)
    ///
    /// Returns `None` if either key is missing.
    #[cfg(feature = "env")]
    pub fn from_env() -> Option<Self> {
        use std::env;

        let access_key_id = env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let mut credentials = Self::new(access_key_id, secret_access_key);

        if let Ok(token) = env::var("AWS_SESSION_TOKEN")
            && !token.is_empty()
        {
            credentials = credentials.with_session_token(token);
        }

        Some(credentials)
    }

    /// The access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub(crate) fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    pub(crate) fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|t| t.expose_secret())
    }
}
