use crate::error::{RosetteError, RosetteResult};
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ROSETTE_API_KEY";

/// API key credential for the Rosette API.
///
/// The key is sent in the `X-RosetteAPI-Key` header of every request.
#[derive(Clone)]
pub struct RosetteCredential {
    key: SecretString,
}

impl RosetteCredential {
    /// Create a credential from the `ROSETTE_API_KEY` environment variable.
    pub fn from_env() -> RosetteResult<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(Self::api_key(key)),
            _ => Err(RosetteError::MissingConfig(format!(
                "API key is required. Set it via builder or {API_KEY_ENV} env var."
            ))),
        }
    }

    /// Create an API key credential.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }

    /// The raw key, for the request header.
    pub(crate) fn expose(&self) -> &str {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for RosetteCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RosetteCredential(****)")
    }
}
