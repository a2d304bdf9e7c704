use anyhow::Context;

use crate::domain::order::ExpectednessSetting;
use crate::utils::RetryConfig;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_SETTING_ENV: &str = "ORDER_DEFAULT_TRANSITION_SETTING";
pub const DISPATCH_MAX_ATTEMPTS_ENV: &str = "ORDER_DISPATCH_MAX_ATTEMPTS";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderLifecycleConfig {
    /// Setting used by status updates that don't name one
    pub default_setting: ExpectednessSetting,
    /// Backoff for dispatcher adapters that retry delivery
    pub dispatch_retry: RetryConfig,
}

impl OrderLifecycleConfig {
    /// Defaults overridden by environment variables, when set
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DEFAULT_SETTING_ENV) {
            config.default_setting = raw
                .parse()
                .with_context(|| format!("invalid {}", DEFAULT_SETTING_ENV))?;
        }

        if let Some(raw) = lookup(DISPATCH_MAX_ATTEMPTS_ENV) {
            let attempts: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {}", DISPATCH_MAX_ATTEMPTS_ENV))?;
            anyhow::ensure!(attempts > 0, "{} must be at least 1", DISPATCH_MAX_ATTEMPTS_ENV);
            config.dispatch_retry.max_attempts = attempts;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = OrderLifecycleConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.default_setting, ExpectednessSetting::RequireNextUp);
        assert_eq!(config.dispatch_retry, RetryConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = OrderLifecycleConfig::from_lookup(lookup_from(&[
            (DEFAULT_SETTING_ENV, "allow-unexpected"),
            (DISPATCH_MAX_ATTEMPTS_ENV, "7"),
        ]))
        .unwrap();

        assert_eq!(config.default_setting, ExpectednessSetting::AllowUnexpected);
        assert_eq!(config.dispatch_retry.max_attempts, 7);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(OrderLifecycleConfig::from_lookup(lookup_from(&[(DEFAULT_SETTING_ENV, "lenient")])).is_err());
        assert!(OrderLifecycleConfig::from_lookup(lookup_from(&[(DISPATCH_MAX_ATTEMPTS_ENV, "0")])).is_err());
        assert!(OrderLifecycleConfig::from_lookup(lookup_from(&[(DISPATCH_MAX_ATTEMPTS_ENV, "many")])).is_err());
    }
}
