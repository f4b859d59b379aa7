//! Source and artifact directory layout

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_contracts_directory() -> PathBuf {
    PathBuf::from("./contracts")
}

fn default_contracts_build_directory() -> PathBuf {
    PathBuf::from("./build/contracts")
}

/// Where contract sources live and where compiled artifacts are written.
///
/// Relative paths are interpreted against the process working directory;
/// use [`PathLayout::resolve`] to anchor them elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLayout {
    #[serde(default = "default_contracts_directory")]
    pub contracts_directory: PathBuf,
    #[serde(default = "default_contracts_build_directory")]
    pub contracts_build_directory: PathBuf,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            contracts_directory: default_contracts_directory(),
            contracts_build_directory: default_contracts_build_directory(),
        }
    }
}

impl PathLayout {
    /// Anchor relative directories at `root`; absolute ones are kept
    pub fn resolve(&self, root: &Path) -> PathLayout {
        PathLayout {
            contracts_directory: anchor(root, &self.contracts_directory),
            contracts_build_directory: anchor(root, &self.contracts_build_directory),
        }
    }
}

fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let stripped = path.strip_prefix(".").unwrap_or(path);
    root.join(stripped)
}
