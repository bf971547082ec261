//! Hub construction from host configuration

use crate::config::ActivityConfig;
use crate::hub::{ActivityHub, HubConfig};

/// Build the hub the host asked for
///
/// A missing section or `enabled` not set to `true` yields a disabled hub;
/// otherwise the hub is active and gated by the trimmed token, if any. The
/// host calls [`ActivityHub::shutdown`] from its own shutdown sequence.
pub fn create_hub(activity: Option<&ActivityConfig>) -> ActivityHub {
    ActivityHub::new(HubConfig::from_activity(activity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::HubPhase;

    #[tokio::test]
    async fn test_missing_config_is_disabled() {
        let hub = create_hub(None);

        assert!(!hub.is_enabled());
        assert_eq!(hub.phase().await, HubPhase::Disabled);
    }

    #[tokio::test]
    async fn test_enabled_false_is_disabled() {
        let activity = ActivityConfig {
            enabled: Some(false),
            token: Some("t".to_string()),
        };
        let hub = create_hub(Some(&activity));

        assert!(!hub.is_enabled());
        assert!(hub.handle_connection_attempt(Some("t")).await.is_none());
    }

    #[tokio::test]
    async fn test_enabled_with_token() {
        let activity = ActivityConfig {
            enabled: Some(true),
            token: Some("  t  ".to_string()),
        };
        let hub = create_hub(Some(&activity));

        assert!(hub.is_enabled());
        assert_eq!(hub.access_token(), Some("t"));
        assert_eq!(hub.phase().await, HubPhase::Active);
        assert!(hub.handle_connection_attempt(Some("t")).await.is_some());
    }

    #[tokio::test]
    async fn test_enabled_blank_token_is_open() {
        let activity = ActivityConfig {
            enabled: Some(true),
            token: Some(String::new()),
        };
        let hub = create_hub(Some(&activity));

        assert!(hub.access_token().is_none());
        assert!(hub.handle_connection_attempt(None).await.is_some());
    }
}
