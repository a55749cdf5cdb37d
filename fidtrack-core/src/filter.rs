//! Exponential smoothing for marker poses
//!
//! The camera server reports raw poses at whatever rate it manages;
//! filtered values blend each raw observation with the previous
//! filtered value so tangibles do not jitter on screen:
//!
//! ```text
//! filtered = raw + (previous - raw) * amount
//! ```
//!
//! `amount` is the weight of the previous value. Angles get the same
//! blend but along the shortest arc, so a marker sitting at the 0/360
//! seam does not spin the long way round.

/// Blend `raw` toward `previous` by `amount`
///
/// `amount` 0.0 returns `raw` unchanged, 1.0 returns `previous`.
#[inline]
pub fn lerp(raw: f32, previous: f32, amount: f32) -> f32 {
    raw + (previous - raw) * amount
}

/// Wrap an angle into [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let mut wrapped = angle - 360.0 * libm::floorf(angle / 360.0);
    // Rounding in the division can leave the remainder one step
    // outside the range on either side
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Blend angles along the shortest arc
///
/// Like [`lerp`] but the delta is taken across the 0/360 seam when
/// that arc is shorter. The result may land just outside [0, 360)
/// (e.g. blending 359 toward 1 passes through 360); callers that need
/// a canonical angle wrap it with [`wrap_degrees`].
#[inline]
pub fn lerp_degrees(raw: f32, previous: f32, amount: f32) -> f32 {
    let mut delta = wrap_degrees(previous - raw);
    if delta > 180.0 {
        delta -= 360.0;
    }
    raw + delta * amount
}
