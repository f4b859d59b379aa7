//! Secret sources consulted when a provider-backed network is connected
//!
//! Profiles only name the variables they need; a [`SecretSource`] supplies
//! the values. The binary uses [`EnvSecrets`], tests and embedders can
//! inject a [`MemorySecrets`].

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Errors a source can report for a value that is present but unusable
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SecretSourceError {
    #[error("{0} is set but is not valid UTF-8")]
    NotUnicode(String),
}

/// Read-only lookup of secret values by variable name
pub trait SecretSource {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Retrieve a value. Empty values are reported as absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretSourceError>;
}

/// Process environment, optionally primed from a `.env` file
#[derive(Debug, Default)]
pub struct EnvSecrets {
    _private: (),
}

impl EnvSecrets {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Load `.env` from the working directory (or a parent) before reading.
    ///
    /// A missing `.env` is not an error; variables already set in the
    /// environment take precedence over the file.
    pub fn with_dotenv() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => tracing::debug!("no .env file found"),
            Err(e) => tracing::warn!(error = %e, "failed to load .env"),
        }
        Self::new()
    }
}

impl SecretSource for EnvSecrets {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Result<Option<String>, SecretSourceError> {
        match env::var(key) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(SecretSourceError::NotUnicode(key.to_string())),
        }
    }
}

/// In-memory source
#[derive(Debug, Default, Clone)]
pub struct MemorySecrets {
    values: HashMap<String, String>,
}

impl MemorySecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl SecretSource for MemorySecrets {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, SecretSourceError> {
        Ok(self.values.get(key).filter(|v| !v.is_empty()).cloned())
    }
}

impl<K, V> FromIterator<(K, V)> for MemorySecrets
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut secrets = MemorySecrets::new();
        for (k, v) in iter {
            secrets.insert(k, v);
        }
        secrets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_get() {
        let secrets = MemorySecrets::new().with("PRIVATE_KEY", "0xabc123");
        assert_eq!(secrets.get("PRIVATE_KEY"), Ok(Some("0xabc123".to_string())));
        assert_eq!(secrets.get("SEPOLIA_URL"), Ok(None));
    }

    #[test]
    fn test_memory_empty_value_is_absent() {
        let secrets: MemorySecrets = [("SEPOLIA_URL", "")].into_iter().collect();
        assert_eq!(secrets.get("SEPOLIA_URL"), Ok(None));
    }

    #[test]
    fn test_env_get_direct() {
        env::set_var("DSHARE_TEST_SECRET_7731", "value");
        let store = EnvSecrets::new();
        assert_eq!(store.name(), "env");
        assert_eq!(
            store.get("DSHARE_TEST_SECRET_7731"),
            Ok(Some("value".to_string()))
        );
        env::remove_var("DSHARE_TEST_SECRET_7731");
    }

    #[test]
    fn test_env_empty_is_absent() {
        env::set_var("DSHARE_TEST_EMPTY_7732", "");
        assert_eq!(EnvSecrets::new().get("DSHARE_TEST_EMPTY_7732"), Ok(None));
        env::remove_var("DSHARE_TEST_EMPTY_7732");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_non_unicode_is_error() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        env::set_var("DSHARE_TEST_BYTES_7733", OsString::from_vec(vec![0x30, 0x78, 0xff]));
        assert_eq!(
            EnvSecrets::new().get("DSHARE_TEST_BYTES_7733"),
            Err(SecretSourceError::NotUnicode("DSHARE_TEST_BYTES_7733".to_string()))
        );
        env::remove_var("DSHARE_TEST_BYTES_7733");
    }
}
