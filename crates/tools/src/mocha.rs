//! Test-runner options handed to the external harness

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Overrides for the mocha test runner; empty by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestRunnerOptions {
    /// Per-test timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl TestRunnerOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_timeout() {
        assert_eq!(TestRunnerOptions::default().timeout(), None);
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(toml::from_str::<TestRunnerOptions>("timeout = 100000").is_err());
    }

    #[test]
    fn test_timeout_from_toml() {
        let opts: TestRunnerOptions = toml::from_str("timeout_ms = 100000").unwrap();
        assert_eq!(opts.timeout(), Some(Duration::from_secs(100)));
    }
}
