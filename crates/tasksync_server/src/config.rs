//! Server configuration.

use std::time::Duration;
use tasksync_engine::Reconciler;

/// Configuration for the sync service core.
///
/// The signing secret is the only required external configuration; it is
/// passed explicitly rather than read from a module-wide constant so test
/// instances can be isolated.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret key for token signing, process-wide and read-only after startup.
    pub secret: Vec<u8>,
    /// Equality window for snapshot timestamp comparison.
    pub tolerance: Duration,
}

impl ServerConfig {
    /// Creates a configuration with the given signing secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: Reconciler::DEFAULT_TOLERANCE,
        }
    }

    /// Sets the timestamp equality window.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerance_is_one_second() {
        let config = ServerConfig::new(b"secret".to_vec());
        assert_eq!(config.tolerance, Duration::from_secs(1));
    }

    #[test]
    fn config_builder() {
        let config =
            ServerConfig::new(b"secret".to_vec()).with_tolerance(Duration::from_secs(5));
        assert_eq!(config.secret, b"secret");
        assert_eq!(config.tolerance, Duration::from_secs(5));
    }
}
