use std::time::Duration;

use crate::error::NearbyError;

/// Deepest zoom level map tiles are served at.
pub const MAX_ZOOM_LEVEL: u8 = 20;

/// Tunables for a [`SearchCoordinator`](crate::SearchCoordinator).
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Length of the viewport throttle window; at most one search is
    /// dispatched per window, using the last viewport centre seen in it.
    pub throttle_window: Duration,
    /// Zoom level used when centring on the user after the first appearance.
    pub city_zoom_level: u8,
    /// Zoom level used for an explicit "center on me" request.
    pub centering_zoom_level: u8,
    /// Drop successful search responses older than the newest one already
    /// applied. Off by default: the last response to arrive wins.
    pub discard_stale_responses: bool,
    /// How long a [`ManualLocationSource`](crate::ManualLocationSource) built
    /// with `from_config` waits for a fix in `fetch_once`.
    pub location_fix_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_secs(1),
            city_zoom_level: 12,
            centering_zoom_level: 15,
            discard_stale_responses: false,
            location_fix_timeout: Duration::from_secs(10),
        }
    }
}

impl CoordinatorConfig {
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::new()
    }
}

/// Builder for creating coordinator configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig::default(),
        }
    }

    /// Short throttle window and stale response filtering, for fast networks
    pub fn responsive() -> Self {
        let mut builder = Self::new();
        builder.config.throttle_window = Duration::from_millis(400);
        builder.config.discard_stale_responses = true;
        builder
    }

    /// Fewer searches and a longer wait for a GPS fix
    pub fn battery_saver() -> Self {
        let mut builder = Self::new();
        builder.config.throttle_window = Duration::from_secs(3);
        builder.config.location_fix_timeout = Duration::from_secs(30);
        builder
    }

    /// Set the viewport throttle window (clamped to at least one millisecond)
    pub fn throttle_window(mut self, window: Duration) -> Self {
        self.config.throttle_window = window.max(Duration::from_millis(1));
        self
    }

    /// Set both zoom levels used when centring the map
    pub fn zoom_levels(mut self, city: u8, centering: u8) -> Result<Self, NearbyError> {
        for level in [city, centering] {
            if level > MAX_ZOOM_LEVEL {
                return Err(NearbyError::ConfigError(format!(
                    "Zoom level must be between 0 and {MAX_ZOOM_LEVEL}, got {level}"
                )));
            }
        }
        self.config.city_zoom_level = city;
        self.config.centering_zoom_level = centering;
        Ok(self)
    }

    /// Enable or disable dropping of out-of-order search responses
    pub fn discard_stale_responses(mut self, enabled: bool) -> Self {
        self.config.discard_stale_responses = enabled;
        self
    }

    /// Set how long a one-shot location fetch may wait for a fix
    pub fn location_fix_timeout(mut self, timeout: Duration) -> Self {
        self.config.location_fix_timeout = timeout;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> CoordinatorConfig {
        self.config
    }
}
