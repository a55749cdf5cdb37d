//! Marker frame wire format
//!
//! The vision server sends one UDP datagram per camera frame, little
//! endian throughout:
//!
//! ```text
//! ┌────────────────┬────────────────┬─────────────────────────────┐
//! │ frame_number   │ marker_count   │ marker_count observations   │
//! │ i32            │ i32            │ 20 bytes each               │
//! └────────────────┴────────────────┴─────────────────────────────┘
//!
//! observation:
//! ┌──────┬──────┬──────┬────────┬──────┐
//! │ id   │ x    │ y    │ angle  │ size │
//! │ i32  │ f32  │ f32  │ f32    │ f32  │
//! └──────┴──────┴──────┴────────┴──────┘
//! ```
//!
//! Positions are normalized to [0, 1] over the tracking area, angle is
//! degrees, size is normalized area coverage.
//!
//! ## Count mismatches
//!
//! Real camera servers occasionally pad or clip datagrams, so the
//! declared count is not trusted: the decoder reads however many whole
//! records the payload actually holds, capped by the declared count,
//! and flags the frame as [`truncated`](MarkerFrame::truncated) when
//! the two disagree. Payloads shorter than the header, or with ragged
//! trailing bytes that do not divide into whole records, are rejected
//! outright as [`MalformedFrame`](crate::TrackingError::MalformedFrame).

use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use crate::errors::{TrackingError, TrackingResult};

/// Fixed frame header: `frame_number` + `marker_count`
pub const HEADER_LEN: usize = 8;

/// Bytes per encoded observation
pub const RECORD_LEN: usize = 20;

/// Most observations one decoded frame can carry
///
/// Generously above any real installation (tables track 24 ids);
/// frames carrying more are clipped and flagged truncated.
pub const MAX_FRAME_OBSERVATIONS: usize = 64;

/// A single marker's raw pose as reported in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMarkerObservation {
    /// Fiducial id encoded in the printed pattern
    pub id: i32,
    /// Normalized x in [0, 1] over the tracking area
    pub x: f32,
    /// Normalized y in [0, 1] over the tracking area
    pub y: f32,
    /// Rotation in degrees [0, 360)
    pub angle: f32,
    /// Normalized size (tracking-area coverage)
    pub size: f32,
}

/// One decoded camera frame
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFrame {
    /// Server-side frame counter
    pub frame_number: i32,
    /// Observations in wire order
    pub observations: Vec<RawMarkerObservation, MAX_FRAME_OBSERVATIONS>,
    /// Declared count disagreed with the payload (clipped or padded)
    pub truncated: bool,
}

impl MarkerFrame {
    /// Empty frame, useful as a timeout-only tick
    pub fn empty(frame_number: i32) -> Self {
        Self {
            frame_number,
            observations: Vec::new(),
            truncated: false,
        }
    }
}

/// Bytes an encoded frame with `count` observations occupies
pub const fn encoded_len(count: usize) -> usize {
    HEADER_LEN + count * RECORD_LEN
}

/// Decode one datagram payload into a frame
///
/// Pure function of the input bytes; tolerant of count mismatches as
/// described in the module docs.
pub fn decode_frame(payload: &[u8]) -> TrackingResult<MarkerFrame> {
    if payload.len() < HEADER_LEN {
        return Err(TrackingError::MalformedFrame { len: payload.len() });
    }

    let body = &payload[HEADER_LEN..];
    if body.len() % RECORD_LEN != 0 {
        return Err(TrackingError::MalformedFrame { len: payload.len() });
    }

    let frame_number = LittleEndian::read_i32(&payload[0..4]);
    let declared = LittleEndian::read_i32(&payload[4..8]).max(0) as usize;
    let available = body.len() / RECORD_LEN;

    let count = declared.min(available).min(MAX_FRAME_OBSERVATIONS);
    let truncated = count != declared || count != available;
    if truncated {
        log_warn!(
            "frame {}: declared {} markers, payload holds {}, reading {}",
            frame_number,
            declared,
            available,
            count
        );
    }

    let mut observations = Vec::new();
    for i in 0..count {
        let record = &body[i * RECORD_LEN..(i + 1) * RECORD_LEN];
        let observation = RawMarkerObservation {
            id: LittleEndian::read_i32(&record[0..4]),
            x: LittleEndian::read_f32(&record[4..8]),
            y: LittleEndian::read_f32(&record[8..12]),
            angle: LittleEndian::read_f32(&record[12..16]),
            size: LittleEndian::read_f32(&record[16..20]),
        };
        // Capacity is count-checked above; push cannot fail
        let _ = observations.push(observation);
    }

    Ok(MarkerFrame {
        frame_number,
        observations,
        truncated,
    })
}

/// Encode a frame into `out`, returning the bytes written
///
/// Inverse of [`decode_frame`]; the only sanctioned producer of wire
/// frames for simulators and tests.
pub fn encode_frame(
    frame_number: i32,
    observations: &[RawMarkerObservation],
    out: &mut [u8],
) -> TrackingResult<usize> {
    let needed = encoded_len(observations.len());
    if out.len() < needed {
        return Err(TrackingError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }

    LittleEndian::write_i32(&mut out[0..4], frame_number);
    LittleEndian::write_i32(&mut out[4..8], observations.len() as i32);

    for (i, observation) in observations.iter().enumerate() {
        let record = &mut out[HEADER_LEN + i * RECORD_LEN..HEADER_LEN + (i + 1) * RECORD_LEN];
        LittleEndian::write_i32(&mut record[0..4], observation.id);
        LittleEndian::write_f32(&mut record[4..8], observation.x);
        LittleEndian::write_f32(&mut record[8..12], observation.y);
        LittleEndian::write_f32(&mut record[12..16], observation.angle);
        LittleEndian::write_f32(&mut record[16..20], observation.size);
    }

    Ok(needed)
}
