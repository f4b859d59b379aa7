//! Error taxonomy for configuration loading and connection resolution

use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A secret required by a provider-backed network is absent or empty.
    #[error("{var} not found for network '{network}'. Set it in the environment or in .env")]
    MissingSecret { var: String, network: String },

    /// A secret is present but cannot be used as given.
    #[error("{var} for network '{network}' is set but unreadable: {reason}")]
    InvalidSecret {
        var: String,
        network: String,
        reason: String,
    },

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid endpoint for network '{network}': {url}. Must start with http://, https://, ws:// or wss://")]
    InvalidEndpoint { network: String, url: String },

    #[error("Invalid compiler version '{version}': {reason}")]
    InvalidCompilerVersion { version: String, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Name of the missing variable, if this is a missing-secret error.
    pub fn missing_var(&self) -> Option<&str> {
        match self {
            ConfigError::MissingSecret { var, .. } => Some(var),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_message_names_variable() {
        let err = ConfigError::MissingSecret {
            var: "SEPOLIA_URL".to_string(),
            network: "sepolia".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("SEPOLIA_URL"));
        assert!(msg.contains(".env"));
        assert_eq!(err.missing_var(), Some("SEPOLIA_URL"));
    }

    #[test]
    fn test_missing_var_none_for_other_errors() {
        let err = ConfigError::UnknownNetwork("mainnet".to_string());
        assert_eq!(err.missing_var(), None);
    }
}
