//! Common helpers for integration tests
//!
//! This module provides:
//! - Observation and payload builders for wire-level tests
//! - Byte-mangling helpers for corruption scenarios
//! - A table snapshot helper for "nothing changed" assertions

#![allow(dead_code)]

use fidtrack_core::wire::{self, RawMarkerObservation, HEADER_LEN, RECORD_LEN};
use fidtrack_core::{MarkerState, MarkerTable};

/// Observation with the default test size
pub fn obs(id: i32, x: f32, y: f32, angle: f32) -> RawMarkerObservation {
    RawMarkerObservation {
        id,
        x,
        y,
        angle,
        size: 0.05,
    }
}

/// Encode a frame into an owned payload
pub fn encode(frame_number: i32, observations: &[RawMarkerObservation]) -> Vec<u8> {
    let mut buf = vec![0u8; wire::encoded_len(observations.len())];
    let len = wire::encode_frame(frame_number, observations, &mut buf)
        .expect("buffer sized exactly for the observations");
    buf.truncate(len);
    buf
}

/// Overwrite the declared marker count without touching the records
pub fn with_declared_count(mut payload: Vec<u8>, declared: i32) -> Vec<u8> {
    assert!(payload.len() >= HEADER_LEN);
    payload[4..8].copy_from_slice(&declared.to_le_bytes());
    payload
}

/// Cut a payload after `records` whole records, keeping the header
pub fn cut_after_records(payload: &[u8], records: usize) -> Vec<u8> {
    payload[..HEADER_LEN + records * RECORD_LEN].to_vec()
}

/// Copy of every marker slot, for before/after comparisons
pub fn snapshot(table: &MarkerTable) -> Vec<MarkerState> {
    table.states().to_vec()
}
