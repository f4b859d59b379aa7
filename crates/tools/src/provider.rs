//! Two-phase connection resolution
//!
//! [`describe`](crate::Config::describe) produces a [`ProfileDescriptor`]
//! without touching any secret. [`connect`] then resolves the descriptor
//! against a [`SecretSource`], failing loudly when a required value is
//! missing. No network I/O happens here; the resolved connection is handed
//! to the external deployer.

use secrecy::SecretString;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::{ChainId, Connection, NetworkProfile, ProviderFactory};
use crate::secrets::SecretSource;

const ENDPOINT_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

/// Secret-free view of a profile, ready to be connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDescriptor {
    pub name: String,
    pub chain_id: ChainId,
    pub connection: Connection,
}

impl ProfileDescriptor {
    pub fn from_profile(profile: &NetworkProfile) -> Self {
        Self {
            name: profile.name.clone(),
            chain_id: profile.chain_id,
            connection: profile.connection.clone(),
        }
    }

    /// Variables a secret source must provide before [`connect`] succeeds
    pub fn required_secrets(&self) -> Vec<&str> {
        match &self.connection {
            Connection::Host { .. } => Vec::new(),
            Connection::Provider(factory) => factory.required_vars().to_vec(),
        }
    }
}

/// Signing provider bound to one key and one RPC endpoint
pub struct WalletProvider {
    network: String,
    endpoint: String,
    private_key: SecretString,
    pub number_of_addresses: u32,
    pub share_nonce: bool,
    pub polling_interval: Duration,
}

impl WalletProvider {
    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn private_key(&self) -> &SecretString {
        &self.private_key
    }
}

impl fmt::Debug for WalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletProvider")
            .field("network", &self.network)
            .field("endpoint", &self.endpoint)
            .field("private_key", &"[REDACTED]")
            .field("number_of_addresses", &self.number_of_addresses)
            .field("share_nonce", &self.share_nonce)
            .field("polling_interval", &self.polling_interval)
            .finish()
    }
}

/// Outcome of [`connect`]
#[derive(Debug)]
pub enum ResolvedConnection {
    /// Plain JSON-RPC node, no credentials
    Direct { url: String },
    Wallet(WalletProvider),
}

impl ResolvedConnection {
    pub fn endpoint(&self) -> &str {
        match self {
            ResolvedConnection::Direct { url } => url,
            ResolvedConnection::Wallet(wallet) => wallet.endpoint(),
        }
    }
}

/// Resolve a descriptor into a usable connection.
///
/// Host profiles never consult `secrets`. Provider profiles require the
/// key variable, then the endpoint variable, and fail with
/// [`ConfigError::MissingSecret`] on the first one absent.
pub fn connect(
    descriptor: &ProfileDescriptor,
    secrets: &dyn SecretSource,
) -> Result<ResolvedConnection, ConfigError> {
    match &descriptor.connection {
        Connection::Host { host, port } => {
            let url = format!("http://{}:{}", host, port);
            tracing::debug!(network = %descriptor.name, %url, "resolved direct connection");
            Ok(ResolvedConnection::Direct { url })
        }
        Connection::Provider(factory) => {
            let wallet = build_wallet(&descriptor.name, factory, secrets)?;
            tracing::info!(
                network = %descriptor.name,
                endpoint = %wallet.endpoint,
                source = secrets.name(),
                "resolved wallet provider"
            );
            Ok(ResolvedConnection::Wallet(wallet))
        }
    }
}

fn build_wallet(
    network: &str,
    factory: &ProviderFactory,
    secrets: &dyn SecretSource,
) -> Result<WalletProvider, ConfigError> {
    let private_key = require(network, &factory.key_var, secrets)?;
    let endpoint = require(network, &factory.url_var, secrets)?;

    if !ENDPOINT_SCHEMES.iter().any(|s| endpoint.starts_with(s)) {
        return Err(ConfigError::InvalidEndpoint {
            network: network.to_string(),
            url: endpoint,
        });
    }

    Ok(WalletProvider {
        network: network.to_string(),
        endpoint,
        private_key: SecretString::new(private_key),
        number_of_addresses: factory.number_of_addresses,
        share_nonce: factory.share_nonce,
        polling_interval: Duration::from_millis(factory.polling_interval_ms),
    })
}

fn require(network: &str, var: &str, secrets: &dyn SecretSource) -> Result<String, ConfigError> {
    let value = secrets.get(var).map_err(|e| {
        tracing::error!(network, var, "required secret is unreadable");
        ConfigError::InvalidSecret {
            var: var.to_string(),
            network: network.to_string(),
            reason: e.to_string(),
        }
    })?;

    value.ok_or_else(|| {
        tracing::error!(network, var, "required secret is missing");
        ConfigError::MissingSecret {
            var: var.to_string(),
            network: network.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{EnvSecrets, MemorySecrets};
    use secrecy::ExposeSecret;

    fn sepolia() -> ProfileDescriptor {
        ProfileDescriptor::from_profile(&NetworkProfile::sepolia())
    }

    #[test]
    fn test_required_secrets() {
        assert_eq!(sepolia().required_secrets(), vec!["PRIVATE_KEY", "SEPOLIA_URL"]);
        let dev = ProfileDescriptor::from_profile(&NetworkProfile::development());
        assert!(dev.required_secrets().is_empty());
    }

    #[test]
    fn test_connect_development_without_secrets() {
        let dev = ProfileDescriptor::from_profile(&NetworkProfile::development());
        let conn = connect(&dev, &MemorySecrets::new()).unwrap();
        assert_eq!(conn.endpoint(), "http://127.0.0.1:7545");
        assert!(matches!(conn, ResolvedConnection::Direct { .. }));
    }

    #[test]
    fn test_connect_sepolia() {
        let secrets = MemorySecrets::new()
            .with("PRIVATE_KEY", "0xabc123")
            .with("SEPOLIA_URL", "https://rpc.example/abc");
        let conn = connect(&sepolia(), &secrets).unwrap();
        assert_eq!(conn.endpoint(), "https://rpc.example/abc");
        match conn {
            ResolvedConnection::Wallet(wallet) => {
                assert_eq!(wallet.private_key().expose_secret(), "0xabc123");
                assert_eq!(wallet.network(), "sepolia");
                assert_eq!(wallet.number_of_addresses, 1);
                assert!(wallet.share_nonce);
                assert_eq!(wallet.polling_interval, Duration::from_millis(8000));
            }
            other => panic!("expected wallet, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_checked_first() {
        let err = connect(&sepolia(), &MemorySecrets::new()).unwrap_err();
        assert_eq!(err.missing_var(), Some("PRIVATE_KEY"));
    }

    #[test]
    fn test_missing_url() {
        let secrets = MemorySecrets::new().with("PRIVATE_KEY", "0xabc123");
        let err = connect(&sepolia(), &secrets).unwrap_err();
        assert_eq!(err.missing_var(), Some("SEPOLIA_URL"));
        assert!(err.to_string().contains("SEPOLIA_URL"));
    }

    #[test]
    fn test_empty_url_is_missing() {
        let secrets = MemorySecrets::new()
            .with("PRIVATE_KEY", "0xabc123")
            .with("SEPOLIA_URL", "");
        let err = connect(&sepolia(), &secrets).unwrap_err();
        assert_eq!(err.missing_var(), Some("SEPOLIA_URL"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_key_is_not_reported_missing() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut profile = NetworkProfile::sepolia();
        profile.connection = Connection::Provider(ProviderFactory {
            key_var: "DSHARE_TEST_KEY_8841".to_string(),
            ..ProviderFactory::new("DSHARE_TEST_URL_8841")
        });
        std::env::set_var("DSHARE_TEST_KEY_8841", OsString::from_vec(vec![0x30, 0x78, 0xfe]));
        std::env::set_var("DSHARE_TEST_URL_8841", "https://rpc.example");

        let err = connect(&ProfileDescriptor::from_profile(&profile), &EnvSecrets::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSecret { ref var, .. } if var == "DSHARE_TEST_KEY_8841"
        ));
        assert_eq!(err.missing_var(), None);

        std::env::remove_var("DSHARE_TEST_KEY_8841");
        std::env::remove_var("DSHARE_TEST_URL_8841");
    }

    #[test]
    fn test_rejects_non_rpc_scheme() {
        let secrets = MemorySecrets::new()
            .with("PRIVATE_KEY", "0xabc123")
            .with("SEPOLIA_URL", "ftp://rpc.example");
        assert!(matches!(
            connect(&sepolia(), &secrets),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let secrets = MemorySecrets::new()
            .with("PRIVATE_KEY", "0xdeadbeef")
            .with("SEPOLIA_URL", "wss://rpc.example");
        let conn = connect(&sepolia(), &secrets).unwrap();
        let rendered = format!("{:?}", conn);
        assert!(!rendered.contains("0xdeadbeef"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
