//! Fiducial marker tracking core for Fidtrack
//!
//! Decodes binary marker frames from a vision server, maintains a
//! fixed-capacity table of temporally filtered marker poses, and
//! interprets groups of markers as tangible input tools (sliders,
//! dials, buttons, dice).
//!
//! Key constraints:
//! - No heap allocation in the ingest path
//! - Fixed marker capacity decided at startup, never resized
//! - One mutator per cycle; tools only ever read settled state
//!
//! ```no_run
//! use fidtrack_core::{MarkerTable, TrackingConfig, wire};
//!
//! let config = TrackingConfig::default();
//! let mut table = MarkerTable::new(config);
//!
//! // Decode one datagram and fold it into the table
//! let payload: &[u8] = &[];
//! if let Ok(frame) = wire::decode_frame(payload) {
//!     table.apply_frame(&frame.observations, 0);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Logging shim: compiles to nothing without the "log" feature.
// Defined before the modules so they can use it unqualified.
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod config;
pub mod errors;
pub mod filter;
pub mod markers;
pub mod pipeline;
pub mod queue;
pub mod source;
pub mod time;
pub mod tools;
pub mod wire;

// Public API
pub use config::TrackingConfig;
pub use errors::{ConfigError, TrackingError, TrackingResult};
pub use markers::{MarkerState, MarkerTable, TrackingState, MAX_MARKER_CAPACITY};
pub use pipeline::{CycleReport, TrackingPipeline};
pub use time::{ManualClock, TimeSource, Timestamp};
pub use tools::{MarkerTool, ToolReading, ToolValue};
pub use wire::{MarkerFrame, RawMarkerObservation};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
