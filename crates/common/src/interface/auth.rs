use std::fmt;

use tracing::debug;

use crate::{DotEnvFile, EnvSource, PinError, ProcessEnv, Result};

/// Bearer-token authentication, rendered as an `Authorization: Bearer <token>` header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BearerAuth {
    token: Option<String>,
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl BearerAuth {
    /// Creates a new [`BearerAuth`] from an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    /// Resolves the token stored under `key`, preferring the `.env` file in the working
    /// directory over the process environment.
    pub fn from_env(key: &str) -> Result<Self> {
        Self::from_sources(key, &DotEnvFile::default(), &ProcessEnv)
    }

    /// Resolves the token stored under `key`, trying `dotenv` first and `process` second.
    pub fn from_sources(
        key: &str,
        dotenv: &impl EnvSource,
        process: &impl EnvSource,
    ) -> Result<Self> {
        if key.is_empty() {
            return Err(PinError::AuthKeyNotFound(key.to_string()));
        }

        if let Some(token) = dotenv.lookup(key) {
            debug!("resolved '{}' from dotenv", key);
            return Ok(Self::new(token));
        }

        if let Some(token) = process.lookup(key) {
            debug!("resolved '{}' from process environment", key);
            return Ok(Self::new(token));
        }

        Err(PinError::AuthKeyNotFound(key.to_string()))
    }

    /// The raw token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The `Authorization` header value, or `None` when there is no token.
    pub fn header_value(&self) -> Option<String> {
        self.token.as_deref().filter(|token| !token.is_empty()).map(|token| format!("Bearer {token}"))
    }
}
