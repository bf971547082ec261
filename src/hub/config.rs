//! Hub configuration

use std::time::Duration;

use crate::config::ActivityConfig;

/// Default bounded queue length per viewer
pub const DEFAULT_VIEWER_QUEUE_CAPACITY: usize = 64;

/// Hub configuration options
///
/// Fixed for the lifetime of a hub. The default is disabled, so a hub built
/// from an empty configuration accepts nothing.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Whether the hub accepts viewers at all
    pub enabled: bool,

    /// Shared secret viewers must present (trimmed, never empty)
    access_token: Option<String>,

    /// Outbound frames buffered per viewer before it is dropped as stalled
    pub viewer_queue_capacity: usize,

    /// Maximum concurrent viewers (0 = unlimited)
    pub max_viewers: usize,

    /// Upper bound on a single socket write
    pub write_timeout: Duration,

    /// Upper bound on the close handshake during teardown
    pub close_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: None,
            viewer_queue_capacity: DEFAULT_VIEWER_QUEUE_CAPACITY,
            max_viewers: 0, // Unlimited
            write_timeout: Duration::from_secs(10),
            close_timeout: Duration::from_secs(5),
        }
    }
}

impl HubConfig {
    /// Enabled hub in open mode (no token)
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Disabled hub
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build from the host's activity configuration
    pub fn from_activity(activity: Option<&ActivityConfig>) -> Self {
        let Some(activity) = activity else {
            return Self::disabled();
        };

        Self {
            enabled: activity.is_enabled(),
            ..Default::default()
        }
        .access_token(activity.token.as_deref())
    }

    /// Set the access token; blank tokens mean open mode
    pub fn access_token<S: AsRef<str>>(mut self, token: Option<S>) -> Self {
        self.access_token = token
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Set the per-viewer queue length (at least 1)
    pub fn viewer_queue_capacity(mut self, capacity: usize) -> Self {
        self.viewer_queue_capacity = capacity.max(1);
        self
    }

    /// Set maximum concurrent viewers
    pub fn max_viewers(mut self, max: usize) -> Self {
        self.max_viewers = max;
        self
    }

    /// Set socket write timeout
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set close handshake timeout
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }

    /// Configured token, if any
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();

        assert!(!config.enabled);
        assert!(config.token().is_none());
        assert_eq!(config.viewer_queue_capacity, DEFAULT_VIEWER_QUEUE_CAPACITY);
        assert_eq!(config.max_viewers, 0);
    }

    #[test]
    fn test_token_trimmed() {
        let config = HubConfig::enabled().access_token(Some("  secret \n"));

        assert_eq!(config.token(), Some("secret"));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let config = HubConfig::enabled().access_token(Some("   "));

        assert!(config.token().is_none());
    }

    #[test]
    fn test_queue_capacity_floor() {
        let config = HubConfig::enabled().viewer_queue_capacity(0);

        assert_eq!(config.viewer_queue_capacity, 1);
    }

    #[test]
    fn test_from_activity() {
        let activity = ActivityConfig {
            enabled: Some(true),
            token: Some(" tok ".to_string()),
        };
        let config = HubConfig::from_activity(Some(&activity));

        assert!(config.enabled);
        assert_eq!(config.token(), Some("tok"));
    }

    #[test]
    fn test_from_missing_activity_is_disabled() {
        assert!(!HubConfig::from_activity(None).enabled);

        let activity = ActivityConfig {
            enabled: None,
            token: Some("tok".to_string()),
        };
        let config = HubConfig::from_activity(Some(&activity));
        assert!(!config.enabled);
        assert_eq!(config.token(), Some("tok"));
    }

    #[test]
    fn test_builder_chaining() {
        let config = HubConfig::enabled()
            .access_token(Some("t"))
            .viewer_queue_capacity(8)
            .max_viewers(3)
            .write_timeout(Duration::from_secs(2))
            .close_timeout(Duration::from_millis(500));

        assert!(config.enabled);
        assert_eq!(config.token(), Some("t"));
        assert_eq!(config.viewer_queue_capacity, 8);
        assert_eq!(config.max_viewers, 3);
        assert_eq!(config.write_timeout, Duration::from_secs(2));
        assert_eq!(config.close_timeout, Duration::from_millis(500));
    }
}
