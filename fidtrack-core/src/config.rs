//! Tracking configuration
//!
//! All tunables for the ingest path live here. The defaults match the
//! values museum installations have shipped with for years; the preset
//! constructors cover the two usual deviations (twitchy tangibles that
//! need faster response, and noisy camera rigs that need heavier
//! smoothing).
//!
//! Filter amounts are the weight of the *previous* filtered value:
//! 0.0 passes raw observations straight through, values near 1.0
//! barely move. Both must lie in [0, 1].

use crate::errors::ConfigError;
use crate::markers::MAX_MARKER_CAPACITY;

/// Tunables for the tracking table and its filters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingConfig {
    /// Number of marker ids the table tracks, ids `0..max_markers`
    pub max_markers: usize,
    /// How long a marker stays `Inferred` after its last observation
    pub tracking_timeout_ms: u64,
    /// Smoothing weight for x/y/size (weight of previous value)
    pub position_filter: f32,
    /// Smoothing weight for angle (weight of previous value)
    pub rotation_filter: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_markers: 24,
            tracking_timeout_ms: 250,
            position_filter: 0.5,
            rotation_filter: 0.25,
        }
    }
}

impl TrackingConfig {
    /// Light filtering and a short timeout for fast-moving tangibles
    pub fn responsive() -> Self {
        Self {
            tracking_timeout_ms: 150,
            position_filter: 0.25,
            rotation_filter: 0.1,
            ..Self::default()
        }
    }

    /// Heavy filtering and a long timeout for unstable camera rigs
    pub fn steady() -> Self {
        Self {
            tracking_timeout_ms: 500,
            position_filter: 0.8,
            rotation_filter: 0.6,
            ..Self::default()
        }
    }

    /// Set the tracked id range
    pub fn with_max_markers(mut self, max_markers: usize) -> Self {
        self.max_markers = max_markers;
        self
    }

    /// Set the occlusion-inference timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.tracking_timeout_ms = timeout_ms;
        self
    }

    /// Set both filter amounts
    pub fn with_filters(mut self, position: f32, rotation: f32) -> Self {
        self.position_filter = position;
        self.rotation_filter = rotation;
        self
    }

    /// Reject configurations the table cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_markers == 0 || self.max_markers > MAX_MARKER_CAPACITY {
            return Err(ConfigError::BadMarkerCount {
                requested: self.max_markers,
                capacity: MAX_MARKER_CAPACITY,
            });
        }
        if !(0.0..=1.0).contains(&self.position_filter)
            || !(0.0..=1.0).contains(&self.rotation_filter)
        {
            return Err(ConfigError::BadFilterAmount);
        }
        Ok(())
    }

    /// Copy with out-of-range values forced into range
    ///
    /// Used where a bad value should degrade, not abort: filter
    /// amounts clamp to [0, 1], `max_markers` to the table capacity.
    pub fn clamped(mut self) -> Self {
        self.max_markers = self.max_markers.clamp(1, MAX_MARKER_CAPACITY);
        self.position_filter = self.position_filter.clamp(0.0, 1.0);
        self.rotation_filter = self.rotation_filter.clamp(0.0, 1.0);
        self
    }
}
