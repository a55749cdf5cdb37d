//! Property tests for the angle filter
//!
//! Angles come from real camera measurements, so the wrap and blend
//! helpers must behave over the whole finite range, not just the
//! handful of angles unit tests pick.

use fidtrack_core::filter::{lerp, lerp_degrees, wrap_degrees};
use proptest::prelude::*;

proptest! {
    #[test]
    fn wrap_lands_in_canonical_range(angle in -100_000.0..100_000.0f32) {
        let wrapped = wrap_degrees(angle);
        prop_assert!((0.0..360.0).contains(&wrapped), "wrap({}) = {}", angle, wrapped);
    }

    #[test]
    fn wrap_is_idempotent(angle in -100_000.0..100_000.0f32) {
        let once = wrap_degrees(angle);
        prop_assert_eq!(wrap_degrees(once), once);
    }

    #[test]
    fn blend_takes_the_short_way(
        raw in 0.0..360.0f32,
        previous in 0.0..360.0f32,
        amount in 0.0..1.0f32,
    ) {
        let blended = lerp_degrees(raw, previous, amount);

        // The signed step away from the raw angle never exceeds half a
        // turn - the blend must not travel the long way around
        let step = (blended - raw).abs();
        prop_assert!(step <= 180.0 + 1e-3, "raw {} prev {} -> {}", raw, previous, blended);
    }

    #[test]
    fn blend_endpoints_are_exact(raw in 0.0..360.0f32, previous in 0.0..360.0f32) {
        // amount 0 ignores history entirely
        prop_assert_eq!(lerp_degrees(raw, previous, 0.0), raw);
        prop_assert_eq!(lerp(raw, previous, 0.0), raw);
        // amount 1 reproduces the previous angle modulo a full turn
        let held = wrap_degrees(lerp_degrees(raw, previous, 1.0));
        prop_assert!((held - previous).abs() < 1e-2 || (held - previous).abs() > 359.0);
    }
}
