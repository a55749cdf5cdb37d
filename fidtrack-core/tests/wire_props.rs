//! Property tests for the wire format
//!
//! The decoder faces whatever the network delivers, so these
//! properties hold over arbitrary bytes, arbitrary cut points and
//! arbitrary declared counts - not just the payloads a well-behaved
//! server produces.

mod common;

use fidtrack_core::wire::{
    self, RawMarkerObservation, HEADER_LEN, MAX_FRAME_OBSERVATIONS, RECORD_LEN,
};
use fidtrack_core::TrackingError;
use proptest::prelude::*;

fn any_observation() -> impl Strategy<Value = RawMarkerObservation> {
    (any::<i32>(), -10.0..10.0f32, -10.0..10.0f32, 0.0..360.0f32, 0.0..1.0f32).prop_map(
        |(id, x, y, angle, size)| RawMarkerObservation {
            id,
            x,
            y,
            angle,
            size,
        },
    )
}

proptest! {
    #[test]
    fn round_trip_preserves_every_field(
        frame_number in any::<i32>(),
        observations in prop::collection::vec(any_observation(), 0..=MAX_FRAME_OBSERVATIONS),
    ) {
        let payload = common::encode(frame_number, &observations);
        let frame = wire::decode_frame(&payload).unwrap();

        prop_assert_eq!(frame.frame_number, frame_number);
        prop_assert!(!frame.truncated);
        prop_assert_eq!(frame.observations.as_slice(), observations.as_slice());
    }

    #[test]
    fn decoder_never_panics_on_arbitrary_bytes(
        payload in prop::collection::vec(any::<u8>(), 0..600),
    ) {
        match wire::decode_frame(&payload) {
            Ok(frame) => {
                prop_assert!(payload.len() >= HEADER_LEN);
                prop_assert!(frame.observations.len() <= MAX_FRAME_OBSERVATIONS);
                prop_assert!(
                    frame.observations.len() * RECORD_LEN <= payload.len() - HEADER_LEN
                );
            }
            Err(TrackingError::MalformedFrame { len }) => {
                prop_assert_eq!(len, payload.len());
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    #[test]
    fn any_cut_is_rejected_or_cleanly_truncated(
        observations in prop::collection::vec(any_observation(), 1..=8),
        cut_fraction in 0.0..1.0f64,
    ) {
        let payload = common::encode(5, &observations);
        let cut = (payload.len() as f64 * cut_fraction) as usize;

        match wire::decode_frame(&payload[..cut]) {
            Ok(frame) => {
                // Only a cut on a record boundary decodes, and it keeps
                // exactly the whole records before the cut
                prop_assert_eq!((cut - HEADER_LEN) % RECORD_LEN, 0);
                let kept = (cut - HEADER_LEN) / RECORD_LEN;
                prop_assert!(frame.truncated);
                prop_assert_eq!(frame.observations.as_slice(), &observations[..kept]);
            }
            Err(TrackingError::MalformedFrame { len }) => {
                prop_assert_eq!(len, cut);
                prop_assert!(cut < HEADER_LEN || (cut - HEADER_LEN) % RECORD_LEN != 0);
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    #[test]
    fn declared_count_is_never_trusted(
        observations in prop::collection::vec(any_observation(), 0..=8),
        declared in any::<i32>(),
    ) {
        let payload = common::with_declared_count(
            common::encode(9, &observations),
            declared,
        );
        let frame = wire::decode_frame(&payload).unwrap();

        let clamped = declared.max(0) as usize;
        let expected = clamped.min(observations.len());
        prop_assert_eq!(frame.observations.len(), expected);
        prop_assert_eq!(
            frame.truncated,
            expected != clamped || expected != observations.len()
        );
        prop_assert_eq!(frame.observations.as_slice(), &observations[..expected]);
    }
}
