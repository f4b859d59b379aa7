//! Dshare Tools Library
//!
//! Network, compiler and test-runner configuration for deploying the
//! Dshare contracts. The configuration only describes targets; signing,
//! compilation and deployment are left to the external toolchain.

pub mod compiler;
pub mod config;
pub mod error;
pub mod logging;
pub mod mocha;
pub mod network;
pub mod paths;
pub mod provider;
pub mod secrets;

pub use compiler::{CompilerSettings, CompilerSpec, Compilers, OptimizerSettings};
pub use config::{Config, ConfigFile};
pub use error::ConfigError;
pub use mocha::TestRunnerOptions;
pub use network::{ChainId, Connection, NetworkProfile, ProviderFactory};
pub use paths::PathLayout;
pub use provider::{connect, ProfileDescriptor, ResolvedConnection, WalletProvider};
pub use secrets::{EnvSecrets, MemorySecrets, SecretSource, SecretSourceError};

/// Load the toolchain configuration. Reads no secrets.
pub fn load_config() -> Result<Config, ConfigError> {
    Config::load()
}
