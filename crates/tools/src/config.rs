//! Dshare toolchain configuration
//!
//! The configuration is built once from the built-in profiles and
//! overlaid with `dshare.toml` when one is present:
//!
//! 1. Built-in networks (`sepolia`, `development`), paths, solc and mocha defaults
//! 2. `dshare.toml` in the working directory, or the file named by `DSHARE_CONFIG`
//! 3. Validation of the merged result
//!
//! Loading never reads secrets. Those are resolved per network by
//! [`crate::provider::connect`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use dshare_tools::{load_config, connect, EnvSecrets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let sepolia = config.describe("sepolia")?;
//! let connection = connect(&sepolia, &EnvSecrets::with_dotenv())?;
//! println!("RPC URL: {}", connection.endpoint());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compiler::Compilers;
use crate::error::ConfigError;
use crate::mocha::TestRunnerOptions;
use crate::network::NetworkProfile;
use crate::paths::PathLayout;
use crate::provider::ProfileDescriptor;

/// File looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "dshare.toml";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_VAR: &str = "DSHARE_CONFIG";

/// Overrides read from `dshare.toml`; every section is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Added to, or replacing, the built-in profiles of the same name
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkProfile>,
    #[serde(default)]
    pub contracts_directory: Option<PathBuf>,
    #[serde(default)]
    pub contracts_build_directory: Option<PathBuf>,
    #[serde(default)]
    pub compilers: Option<Compilers>,
    #[serde(default)]
    pub mocha: Option<TestRunnerOptions>,
}

/// Complete, read-only toolchain configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub networks: BTreeMap<String, NetworkProfile>,
    #[serde(flatten)]
    pub paths: PathLayout,
    pub compilers: Compilers,
    pub mocha: TestRunnerOptions,
}

impl Config {
    /// Built-in configuration with no file overlay
    pub fn builtin() -> Self {
        let networks = NetworkProfile::builtin()
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Config {
            networks,
            paths: PathLayout::default(),
            compilers: Compilers::default(),
            mocha: TestRunnerOptions::default(),
        }
    }

    /// Load configuration from `DSHARE_CONFIG` or the working directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `DSHARE_CONFIG` names a file that cannot be read
    /// - the config file is not valid TOML or has unknown keys
    /// - the merged configuration fails validation
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            return Self::load_file(Path::new(&path));
        }
        Self::load_from_dir(&std::env::current_dir()?)
    }

    /// Load using `dshare.toml` in `dir` if it exists, built-ins otherwise
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load_file(&path)
        } else {
            tracing::debug!(dir = %dir.display(), "no {} found, using built-in configuration", CONFIG_FILE_NAME);
            Self::from_file(None)
        }
    }

    /// Load with an explicit config file, which must exist
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "reading configuration file");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse `content` as a `dshare.toml` overlay
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Self::from_file(Some(file))
    }

    /// Merge an optional overlay onto the built-ins and validate
    pub fn from_file(file: Option<ConfigFile>) -> Result<Self, ConfigError> {
        let mut config = Self::builtin();
        if let Some(file) = file {
            config.overlay(file);
        }
        config.validate()?;

        tracing::info!(
            networks = config.networks.len(),
            solc = %config.compilers.solc.version,
            "configuration loaded"
        );
        Ok(config)
    }

    fn overlay(&mut self, file: ConfigFile) {
        for (name, mut profile) in file.networks {
            profile.name = name.clone();
            if self.networks.contains_key(&name) {
                tracing::debug!(network = %name, "replacing built-in network profile");
            }
            self.networks.insert(name, profile);
        }
        if let Some(dir) = file.contracts_directory {
            self.paths.contracts_directory = dir;
        }
        if let Some(dir) = file.contracts_build_directory {
            self.paths.contracts_build_directory = dir;
        }
        if let Some(compilers) = file.compilers {
            self.compilers = compilers;
        }
        if let Some(mocha) = file.mocha {
            self.mocha = mocha;
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        for profile in self.networks.values() {
            profile.validate()?;
        }

        if self.paths.contracts_directory.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "contracts_directory must not be empty".to_string(),
            ));
        }
        if self.paths.contracts_build_directory.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "contracts_build_directory must not be empty".to_string(),
            ));
        }

        self.compilers.solc.validate()
    }

    /// Look up a profile by name
    pub fn network(&self, name: &str) -> Result<&NetworkProfile, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn network_names(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    /// Secret-free descriptor for `name`, input to [`crate::provider::connect`]
    pub fn describe(&self, name: &str) -> Result<ProfileDescriptor, ConfigError> {
        self.network(name).map(ProfileDescriptor::from_profile)
    }

    /// Print the resolved configuration
    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════════╗");
        println!("║           DSHARE TOOLCHAIN CONFIGURATION RESOLVED              ║");
        println!("╚════════════════════════════════════════════════════════════════╝");

        for profile in self.networks.values() {
            println!("  Network:             {}", profile.name);
            println!("    Chain ID:          {}", profile.chain_id);
            if profile.connection.requires_secrets() {
                let required = ProfileDescriptor::from_profile(profile).required_secrets().join(", ");
                println!("    Secrets:           {}", required);
            } else {
                println!("    Secrets:           (none)");
            }
            if let Some(confirmations) = profile.confirmations {
                println!("    Confirmations:     {}", confirmations);
            }
            if let Some(timeout) = profile.timeout_blocks {
                println!("    Timeout Blocks:    {}", timeout);
            }
            if let Some(gas) = profile.gas {
                println!("    Gas Limit:         {}", gas);
            }
            if let Some(price) = profile.gas_price {
                println!("    Gas Price:         {} wei", price);
            }
            if profile.skip_dry_run {
                println!("    Dry Run:           SKIPPED");
            }
        }

        println!("  Contracts:           {}", self.paths.contracts_directory.display());
        println!("  Build Output:        {}", self.paths.contracts_build_directory.display());

        let solc = &self.compilers.solc;
        println!("  Solc Version:        {}", solc.version);
        println!(
            "  Optimizer:           {} ({} runs)",
            if solc.settings.optimizer.enabled { "ENABLED" } else { "DISABLED" },
            solc.settings.optimizer.runs
        );
        println!("  Via IR:              {}", solc.settings.via_ir);

        match self.mocha.timeout() {
            Some(timeout) => println!("  Mocha Timeout:       {}ms", timeout.as_millis()),
            None => println!("  Mocha Timeout:       (runner default)"),
        }

        println!("╚════════════════════════════════════════════════════════════════╝");
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
