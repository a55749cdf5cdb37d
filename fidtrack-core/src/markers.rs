//! Marker state table with temporal filtering
//!
//! ## Overview
//!
//! One [`MarkerState`] exists per trackable id, preallocated at
//! startup and never resized. Each consumer cycle folds the newest
//! decoded frame into the table with [`MarkerTable::apply_frame`],
//! which classifies every id:
//!
//! ```text
//!              fresh observation this cycle
//!            ┌───────────────────────────────┐
//!            ▼                               │
//!      ┌──────────┐  no observation    ┌───────────┐
//!      │ Tracked  │ ─────────────────► │ Inferred  │
//!      └──────────┘                    └───────────┘
//!            ▲                               │
//!            │        now - last_seen        │
//!            │        > timeout              ▼
//!            │                        ┌────────────┐
//!            └─────────────────────── │ NotTracked │
//!              fresh observation      └────────────┘
//! ```
//!
//! `Inferred` exists to ride out momentary occlusion: a hand passing
//! over a marker should not make the exhibit flicker. Tools therefore
//! treat `Tracked` and `Inferred` alike (see
//! [`TrackingState::is_visible`]).
//!
//! ## Filtering
//!
//! Raw poses are exponentially smoothed ([`crate::filter`]) before
//! they land in the table; the last raw values are kept alongside for
//! diagnostics. The first observation ever for an id snaps the
//! filtered values to raw, since no previous value exists. Later
//! observations always blend, including after a marker has expired to
//! `NotTracked`.

use crate::config::TrackingConfig;
use crate::filter::{lerp, lerp_degrees, wrap_degrees};
use crate::time::Timestamp;
use crate::wire::RawMarkerObservation;

/// Compile-time upper bound on table size
///
/// Runtime `max_markers` may be anything in `[1, MAX_MARKER_CAPACITY]`.
pub const MAX_MARKER_CAPACITY: usize = 64;

/// Classification of one marker id for the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackingState {
    /// Never observed, or last observation beyond the timeout
    #[default]
    NotTracked,
    /// No fresh observation this cycle, but within the timeout
    Inferred,
    /// Fresh observation arrived this cycle
    Tracked,
}

impl TrackingState {
    /// Whether tools should treat the marker as present
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Tracked | Self::Inferred)
    }
}

/// Filtered state of one marker id
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerState {
    /// Marker id, also this entry's index in the table
    pub id: usize,
    /// Filtered x in [0, 1]
    pub x: f32,
    /// Filtered y in [0, 1]
    pub y: f32,
    /// Filtered angle in [0, 360)
    pub angle: f32,
    /// Filtered size
    pub size: f32,
    /// Last raw x
    pub raw_x: f32,
    /// Last raw y
    pub raw_y: f32,
    /// Last raw angle, unwrapped wire value
    pub raw_angle: f32,
    /// Last raw size
    pub raw_size: f32,
    /// When the last raw observation arrived; `None` if never
    pub last_seen: Option<Timestamp>,
    /// Current classification
    pub tracking: TrackingState,
}

impl MarkerState {
    fn blank(id: usize) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            size: 0.0,
            raw_x: 0.0,
            raw_y: 0.0,
            raw_angle: 0.0,
            raw_size: 0.0,
            last_seen: None,
            tracking: TrackingState::NotTracked,
        }
    }

    /// Shorthand for `self.tracking.is_visible()`
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.tracking.is_visible()
    }
}

/// Outcome of one `apply_frame` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// Observations folded into the table
    pub applied: usize,
    /// Observations skipped for an out-of-range id
    pub rejected: usize,
}

/// Fixed-capacity table of per-marker filtered state
///
/// Owned and mutated by the consumer cycle only; tool interpreters
/// read it after `apply_frame` has settled. Cross-thread access is
/// not supported and not needed - the receiver thread hands frames
/// over through [`crate::queue::FrameQueue`] instead.
pub struct MarkerTable {
    config: TrackingConfig,
    states: heapless::Vec<MarkerState, MAX_MARKER_CAPACITY>,
}

impl MarkerTable {
    /// Create a table for ids `0..config.max_markers`
    ///
    /// Out-of-range config values are clamped into range; call
    /// [`TrackingConfig::validate`] first to reject them instead.
    pub fn new(config: TrackingConfig) -> Self {
        let config = config.clamped();
        let mut states = heapless::Vec::new();
        for id in 0..config.max_markers {
            // Capacity equals MAX_MARKER_CAPACITY and max_markers is
            // clamped below it; push cannot fail
            let _ = states.push(MarkerState::blank(id));
        }
        Self { config, states }
    }

    /// The configuration the table was built with (post-clamp)
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Number of tracked ids
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if the table tracks no ids (never after construction)
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State for one id, `None` if outside the table
    pub fn get(&self, id: usize) -> Option<&MarkerState> {
        self.states.get(id)
    }

    /// All states in id order
    pub fn states(&self) -> &[MarkerState] {
        &self.states
    }

    /// Whether tools should treat `id` as present this cycle
    pub fn is_visible(&self, id: usize) -> bool {
        self.get(id).map(|s| s.is_visible()).unwrap_or(false)
    }

    /// Fold one frame's observations into the table
    ///
    /// Runs the timeout pass first, then applies observations in wire
    /// order (later duplicates of an id re-blend over earlier ones,
    /// last write wins). Out-of-range ids are counted, logged, and
    /// skipped without aborting the frame. Calling with no
    /// observations is the idle tick: states only ever decay.
    pub fn apply_frame(
        &mut self,
        observations: &[RawMarkerObservation],
        now: Timestamp,
    ) -> ApplyReport {
        let timeout = self.config.tracking_timeout_ms;
        for state in self.states.iter_mut() {
            state.tracking = match state.last_seen {
                Some(seen) if now.saturating_sub(seen) <= timeout => TrackingState::Inferred,
                _ => TrackingState::NotTracked,
            };
        }

        let mut report = ApplyReport::default();
        for observation in observations {
            let id = match self.index_for(observation.id) {
                Some(id) => id,
                None => {
                    log_warn!(
                        "marker id {} outside [0, {}), observation skipped",
                        observation.id,
                        self.states.len()
                    );
                    report.rejected += 1;
                    continue;
                }
            };

            let position_filter = self.config.position_filter;
            let rotation_filter = self.config.rotation_filter;
            let state = &mut self.states[id];

            if state.last_seen.is_some() {
                state.x = lerp(observation.x, state.x, position_filter);
                state.y = lerp(observation.y, state.y, position_filter);
                state.size = lerp(observation.size, state.size, position_filter);
                state.angle =
                    wrap_degrees(lerp_degrees(observation.angle, state.angle, rotation_filter));
            } else {
                // First observation ever: nothing to blend against
                state.x = observation.x;
                state.y = observation.y;
                state.size = observation.size;
                state.angle = wrap_degrees(observation.angle);
            }

            state.raw_x = observation.x;
            state.raw_y = observation.y;
            state.raw_angle = observation.angle;
            state.raw_size = observation.size;
            state.last_seen = Some(now);
            state.tracking = TrackingState::Tracked;
            report.applied += 1;
        }

        report
    }

    fn index_for(&self, id: i32) -> Option<usize> {
        if id < 0 {
            return None;
        }
        let id = id as usize;
        if id < self.states.len() {
            Some(id)
        } else {
            None
        }
    }
}
