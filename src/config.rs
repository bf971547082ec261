//! Host-facing activity configuration
//!
//! The shape a host embeds in its own config file. Merging is a plain
//! field-by-field override so a CLI or environment layer can sit on top of
//! the file without touching fields it does not set.

use serde::{Deserialize, Serialize};

/// Environment variable toggling the hub
pub const ENV_ENABLED: &str = "A2UI_ACTIVITY_ENABLED";

/// Environment variable carrying the access token
pub const ENV_TOKEN: &str = "A2UI_ACTIVITY_TOKEN";

/// Random bytes in a generated access token (hex encoded to twice as many chars)
const GENERATED_TOKEN_BYTES: usize = 24;

/// Activity section of the host configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityConfig {
    /// Enable the live activity hub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Shared secret viewers must present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Result of [`ActivityConfig::ensure_access_token`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReconciliation {
    /// Configuration to start the hub with
    pub config: ActivityConfig,
    /// Token created during this call, for the host to persist or display
    pub generated_token: Option<String>,
}

impl ActivityConfig {
    /// Whether the hub should be enabled; absent means disabled
    pub fn is_enabled(&self) -> bool {
        self.enabled == Some(true)
    }

    /// Trimmed token, `None` when absent or blank
    pub fn trimmed_token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Overlay `over` onto `base`; fields `over` leaves unset keep the base value
    pub fn merge(base: Option<&ActivityConfig>, over: Option<&ActivityConfig>) -> ActivityConfig {
        let mut merged = base.cloned().unwrap_or_default();
        let Some(over) = over else {
            return merged;
        };

        if over.enabled.is_some() {
            merged.enabled = over.enabled;
        }
        if over.token.is_some() {
            merged.token = over.token.clone();
        }
        merged
    }

    /// Read overrides from the process environment
    ///
    /// `A2UI_ACTIVITY_ENABLED` accepts `1/true/yes/on` and `0/false/no/off`;
    /// other values are ignored with a warning.
    pub fn from_env() -> ActivityConfig {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(lookup: F) -> ActivityConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup(ENV_ENABLED).and_then(|raw| {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" => Some(false),
                other => {
                    tracing::warn!(
                        var = ENV_ENABLED,
                        value = other,
                        "Ignoring unrecognized flag value"
                    );
                    None
                }
            }
        });

        ActivityConfig {
            enabled,
            token: lookup(ENV_TOKEN),
        }
    }

    /// Generate an access token when the hub is enabled without one
    ///
    /// Never fails: a disabled hub or an existing token pass through
    /// unchanged.
    pub fn ensure_access_token(self) -> TokenReconciliation {
        if !self.is_enabled() || self.trimmed_token().is_some() {
            return TokenReconciliation {
                config: self,
                generated_token: None,
            };
        }

        let bytes: [u8; GENERATED_TOKEN_BYTES] = rand::random();
        let token = hex::encode(bytes);
        tracing::info!("Generated activity access token");

        TokenReconciliation {
            config: ActivityConfig {
                token: Some(token.clone()),
                ..self
            },
            generated_token: Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(enabled: Option<bool>, token: Option<&str>) -> ActivityConfig {
        ActivityConfig {
            enabled,
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_override_wins() {
        let base = config(Some(false), Some("old"));
        let over = config(Some(true), Some("new"));

        assert_eq!(
            ActivityConfig::merge(Some(&base), Some(&over)),
            config(Some(true), Some("new"))
        );
    }

    #[test]
    fn test_merge_absent_fields_keep_base() {
        let base = config(Some(true), Some("keep"));
        let over = config(None, None);

        assert_eq!(ActivityConfig::merge(Some(&base), Some(&over)), base);
        assert_eq!(ActivityConfig::merge(Some(&base), None), base);
    }

    #[test]
    fn test_merge_without_base() {
        let over = config(None, Some("tok"));

        assert_eq!(
            ActivityConfig::merge(None, Some(&over)),
            config(None, Some("tok"))
        );
        assert_eq!(ActivityConfig::merge(None, None), ActivityConfig::default());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let parsed: ActivityConfig =
            serde_json::from_str(r#"{"enabled":true,"token":"abc"}"#).unwrap();
        assert_eq!(parsed, config(Some(true), Some("abc")));

        let empty: ActivityConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ActivityConfig::default());
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [(ENV_ENABLED, " Yes "), (ENV_TOKEN, "s3")].into();
        let parsed = ActivityConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(parsed, config(Some(true), Some("s3")));
    }

    #[test]
    fn test_from_vars_bad_flag_ignored() {
        let parsed =
            ActivityConfig::from_vars(|k| (k == ENV_ENABLED).then(|| "maybe".to_string()));

        assert_eq!(parsed, ActivityConfig::default());
    }

    #[test]
    fn test_ensure_token_generates_when_missing() {
        let result = config(Some(true), Some("  ")).ensure_access_token();

        let token = result.generated_token.expect("token generated");
        assert_eq!(token.len(), GENERATED_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(result.config.token.as_deref(), Some(token.as_str()));
        assert!(result.config.is_enabled());
    }

    #[test]
    fn test_ensure_token_keeps_existing() {
        let original = config(Some(true), Some("mine"));
        let result = original.clone().ensure_access_token();

        assert!(result.generated_token.is_none());
        assert_eq!(result.config, original);
    }

    #[test]
    fn test_ensure_token_skips_disabled() {
        let result = config(None, None).ensure_access_token();

        assert!(result.generated_token.is_none());
        assert!(result.config.token.is_none());
    }

    #[test]
    fn test_generated_tokens_differ() {
        let a = config(Some(true), None).ensure_access_token();
        let b = config(Some(true), None).ensure_access_token();

        assert_ne!(a.generated_token, b.generated_token);
    }
}
