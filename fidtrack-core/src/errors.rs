//! Error Types for Marker Frame Ingestion
//!
//! ## Design Philosophy
//!
//! Fidtrack's error system follows the same rules as the rest of the
//! ingest path:
//!
//! 1. **Small Size**: Each variant carries only inline primitives, so
//!    errors can be returned from the per-datagram hot path and stored
//!    in reports without allocation.
//!
//! 2. **No Heap Allocation**: No String anywhere - counts and ids are
//!    inline, messages are `&'static str` at most.
//!
//! 3. **Copy Semantics**: Errors implement Copy so decode results can
//!    be inspected, counted, and re-returned freely.
//!
//! 4. **Never Fatal**: Every condition here is recoverable by dropping
//!    the offending frame or observation. Callers log and continue; a
//!    bad datagram must not take down an exhibit.
//!
//! ## Error Categories
//!
//! ### Wire Violations
//! - `MalformedFrame`: payload too short for the header, or trailing
//!   bytes that do not divide into whole observation records
//!
//! ### Table Violations
//! - `MarkerIdOutOfRange`: observation names an id outside the table;
//!   that observation is skipped, the rest of the frame still applies
//!
//! ### Configuration
//! - `ConfigError`: rejected at construction time, before any frame
//!   is ever processed

use thiserror_no_std::Error;

/// Result type for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Ingest errors - kept small, all recoverable per-frame
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingError {
    /// Payload cannot be decoded as a marker frame
    #[error("Malformed frame: {len} bytes cannot hold a valid frame")]
    MalformedFrame {
        /// Length of the offending payload
        len: usize,
    },

    /// Observation names an id the table does not hold
    #[error("Marker id {id} outside range [0, {max})")]
    MarkerIdOutOfRange {
        /// The id carried by the observation
        id: i32,
        /// Exclusive upper bound of valid ids
        max: usize,
    },

    /// Encode target cannot hold the frame
    #[error("Buffer too small: need {needed}, have {available}")]
    BufferTooSmall {
        /// Bytes the encoded frame requires
        needed: usize,
        /// Bytes the caller provided
        available: usize,
    },
}

/// Configuration rejected at construction time
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_markers` of zero or beyond the compiled table capacity
    #[error("max_markers {requested} outside [1, {capacity}]")]
    BadMarkerCount {
        /// Requested marker count
        requested: usize,
        /// Compile-time table capacity
        capacity: usize,
    },

    /// Filter amount outside [0, 1]
    #[error("Filter amount out of [0, 1]")]
    BadFilterAmount,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TrackingError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::MalformedFrame { len } =>
                defmt::write!(fmt, "Malformed frame ({} bytes)", len),
            Self::MarkerIdOutOfRange { id, max } =>
                defmt::write!(fmt, "Marker id {} outside [0, {})", id, max),
            Self::BufferTooSmall { needed, available } =>
                defmt::write!(fmt, "Buffer too small: need {}, have {}", needed, available),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::BadMarkerCount { requested, capacity } =>
                defmt::write!(fmt, "max_markers {} outside [1, {}]", requested, capacity),
            Self::BadFilterAmount =>
                defmt::write!(fmt, "Filter amount out of [0, 1]"),
        }
    }
}
