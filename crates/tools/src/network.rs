//! Network profiles: deployment targets and how to reach them

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Ethereum Sepolia testnet chain id
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Default environment variable holding the deployer's signing key
pub const DEFAULT_KEY_VAR: &str = "PRIVATE_KEY";

/// Environment variable holding the Sepolia RPC endpoint
pub const SEPOLIA_URL_VAR: &str = "SEPOLIA_URL";

/// Network identifier a profile deploys to.
///
/// `Any` is the `"*"` wildcard used by local chains, which accept
/// whatever id the node reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
    Id(u64),
    Any,
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Id(id) => write!(f, "{}", id),
            ChainId::Any => write!(f, "*"),
        }
    }
}

impl FromStr for ChainId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "*" {
            return Ok(ChainId::Any);
        }
        s.parse::<u64>()
            .map(ChainId::Id)
            .map_err(|_| ConfigError::ValidationError(format!("invalid chain id: {}", s)))
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ChainId::Id(id) => serializer.serialize_u64(*id),
            ChainId::Any => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChainIdVisitor;

        impl<'de> Visitor<'de> for ChainIdVisitor {
            type Value = ChainId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative chain id or \"*\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ChainId, E> {
                Ok(ChainId::Id(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ChainId, E> {
                u64::try_from(v)
                    .map(ChainId::Id)
                    .map_err(|_| E::custom(format!("chain id must be non-negative: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ChainId, E> {
                v.parse().map_err(|e: ConfigError| E::custom(e))
            }
        }

        deserializer.deserialize_any(ChainIdVisitor)
    }
}

fn default_key_var() -> String {
    DEFAULT_KEY_VAR.to_string()
}

fn default_number_of_addresses() -> u32 {
    1
}

fn default_share_nonce() -> bool {
    true
}

fn default_polling_interval_ms() -> u64 {
    8000
}

/// Deferred wallet-provider constructor.
///
/// Holds only the *names* of the variables carrying the signing key and
/// the RPC endpoint; values are looked up when the profile is connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderFactory {
    #[serde(default = "default_key_var")]
    pub key_var: String,
    pub url_var: String,
    /// Accounts derived from the key
    #[serde(default = "default_number_of_addresses")]
    pub number_of_addresses: u32,
    #[serde(default = "default_share_nonce")]
    pub share_nonce: bool,
    #[serde(default = "default_polling_interval_ms")]
    pub polling_interval_ms: u64,
}

impl ProviderFactory {
    /// Factory reading the key from `PRIVATE_KEY` and the endpoint from `url_var`
    pub fn new(url_var: impl Into<String>) -> Self {
        Self {
            key_var: default_key_var(),
            url_var: url_var.into(),
            number_of_addresses: default_number_of_addresses(),
            share_nonce: default_share_nonce(),
            polling_interval_ms: default_polling_interval_ms(),
        }
    }

    /// Variables that must be present to connect, in the order they are checked
    pub fn required_vars(&self) -> [&str; 2] {
        [self.key_var.as_str(), self.url_var.as_str()]
    }
}

/// How a profile reaches its node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Connection {
    /// Unauthenticated node at a fixed address
    Host { host: String, port: u16 },
    /// Signing provider built from secrets on demand
    Provider(ProviderFactory),
}

impl Connection {
    pub fn requires_secrets(&self) -> bool {
        matches!(self, Connection::Provider(_))
    }
}

/// One named deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkProfile {
    /// Filled from the key of the `networks` table
    #[serde(skip)]
    pub name: String,
    pub connection: Connection,
    pub chain_id: ChainId,
    /// Confirmations to await before a transaction is final
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u32>,
    /// Blocks to wait before a transaction attempt is declared failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_blocks: Option<u64>,
    /// Gas limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price in wei
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u64>,
    #[serde(default)]
    pub skip_dry_run: bool,
}

impl NetworkProfile {
    /// Ethereum Sepolia via a wallet provider
    pub fn sepolia() -> Self {
        NetworkProfile {
            name: "sepolia".to_string(),
            connection: Connection::Provider(ProviderFactory::new(SEPOLIA_URL_VAR)),
            chain_id: ChainId::Id(SEPOLIA_CHAIN_ID),
            confirmations: Some(2),
            timeout_blocks: Some(200),
            gas: Some(5_000_000),
            gas_price: Some(10_000_000_000),
            skip_dry_run: true,
        }
    }

    /// Local Ganache node
    pub fn development() -> Self {
        NetworkProfile {
            name: "development".to_string(),
            connection: Connection::Host {
                host: "127.0.0.1".to_string(),
                port: 7545,
            },
            chain_id: ChainId::Any,
            confirmations: None,
            timeout_blocks: None,
            gas: None,
            gas_price: None,
            skip_dry_run: false,
        }
    }

    /// Built-in profiles
    pub fn builtin() -> Vec<NetworkProfile> {
        vec![Self::sepolia(), Self::development()]
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "network name must not be empty".to_string(),
            ));
        }

        match &self.connection {
            Connection::Host { host, port } => {
                if host.trim().is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "network '{}': host must not be empty",
                        self.name
                    )));
                }
                if *port == 0 {
                    return Err(ConfigError::ValidationError(format!(
                        "network '{}': port must be non-zero",
                        self.name
                    )));
                }
            }
            Connection::Provider(factory) => {
                for var in factory.required_vars() {
                    if var.trim().is_empty() {
                        return Err(ConfigError::ValidationError(format!(
                            "network '{}': provider variable names must not be empty",
                            self.name
                        )));
                    }
                }
                if factory.number_of_addresses == 0 {
                    return Err(ConfigError::ValidationError(format!(
                        "network '{}': number_of_addresses must be at least 1",
                        self.name
                    )));
                }
                if factory.polling_interval_ms == 0 {
                    return Err(ConfigError::ValidationError(format!(
                        "network '{}': polling_interval_ms must be non-zero",
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }
}
