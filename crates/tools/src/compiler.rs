//! Solidity compiler selection

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Optimizer flags passed to solc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerSettings {
    pub enabled: bool,
    /// Expected number of executions per opcode over the contract lifetime
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            runs: 200,
        }
    }
}

/// `settings` block of the solc configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSettings {
    pub optimizer: OptimizerSettings,
    /// Compile through the Yul IR pipeline
    pub via_ir: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            optimizer: OptimizerSettings::default(),
            via_ir: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSpec {
    pub version: String,
    #[serde(default)]
    pub settings: CompilerSettings,
}

impl Default for CompilerSpec {
    fn default() -> Self {
        Self {
            version: "0.8.20".to_string(),
            settings: CompilerSettings::default(),
        }
    }
}

impl CompilerSpec {
    /// Parsed compiler version
    pub fn semver(&self) -> Result<semver::Version, ConfigError> {
        semver::Version::parse(self.version.trim()).map_err(|e| {
            ConfigError::InvalidCompilerVersion {
                version: self.version.clone(),
                reason: e.to_string(),
            }
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.semver().map(|_| ())
    }
}

/// Compilers keyed by toolchain; only solc is used
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Compilers {
    #[serde(default)]
    pub solc: CompilerSpec,
}
