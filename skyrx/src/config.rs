use std::time::Duration;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(5_000);

/// Lifecycle settings of one shared state hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HubConfig {
    /// How long the producer keeps running after the last subscriber left.
    pub grace_period: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl HubConfig {
    pub fn from_millis(grace_period_ms: u64) -> Self {
        HubConfig {
            grace_period: Duration::from_millis(grace_period_ms),
        }
    }

    pub fn with_grace_period(self, grace_period: Duration) -> Self {
        Self {
            grace_period,
            ..self
        }
    }
}

/// Settings for both pipelines of the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomeConfig {
    pub favorites: HubConfig,
    pub location: HubConfig,
}

impl HomeConfig {
    /// Same hub settings for both pipelines.
    pub fn uniform(hub: HubConfig) -> Self {
        HomeConfig {
            favorites: hub,
            location: hub,
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grace_period() {
        assert_eq!(HubConfig::default().grace_period, Duration::from_millis(5000));
        assert_eq!(HomeConfig::default().location, HubConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = HubConfig::default().with_grace_period(Duration::from_secs(1));
        assert_eq!(config, HubConfig::from_millis(1000));
        assert_eq!(HomeConfig::uniform(config).favorites, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{
            "favorites": { "grace_period": { "secs": 1, "nanos": 0 } },
            "location": { "grace_period": { "secs": 0, "nanos": 250000000 } }
        }"#;
        let config = HomeConfig::from_json(json).unwrap();
        assert_eq!(config.favorites, HubConfig::from_millis(1000));
        assert_eq!(config.location, HubConfig::from_millis(250));
    }
}
