//! Rotary dial tool
//!
//! Two markers: a reference fixed to the table and one on the
//! rotating part. The value is the relative rotation
//! `(reference.angle - rotating.angle) mod 360`, run through one more
//! wrap-aware exponential filter so on-screen needles hold steady
//! even when both markers jitter in the same frame.

use crate::filter::{lerp_degrees, wrap_degrees};
use crate::markers::MarkerTable;
use crate::tools::{ToolReading, ToolValue};

/// Dial interpreter
pub struct Dial {
    reference_id: usize,
    rotating_id: usize,
    display_filter: f32,
    smoothed: Option<f32>,
}

impl Dial {
    /// Dial reading `rotating_id` against `reference_id`
    pub fn new(reference_id: usize, rotating_id: usize) -> Self {
        Self {
            reference_id,
            rotating_id,
            display_filter: 0.5,
            smoothed: None,
        }
    }

    /// Override the display smoothing weight (weight of previous value)
    pub fn with_display_filter(mut self, amount: f32) -> Self {
        self.display_filter = amount.clamp(0.0, 1.0);
        self
    }

    /// Derive the dial angle from the table
    ///
    /// While either marker is out of view the last smoothed angle is
    /// kept in the reading (with `is_tracked` false), so a needle does
    /// not snap to zero when a hand covers the dial for too long.
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let reference = table.get(self.reference_id).filter(|s| s.is_visible());
        let rotating = table.get(self.rotating_id).filter(|s| s.is_visible());

        match (reference, rotating) {
            (Some(r), Some(m)) => {
                let raw = wrap_degrees(r.angle - m.angle);
                let smoothed = match self.smoothed {
                    Some(previous) => {
                        wrap_degrees(lerp_degrees(raw, previous, self.display_filter))
                    }
                    None => raw,
                };
                self.smoothed = Some(smoothed);
                ToolReading {
                    value: ToolValue::Scalar(smoothed),
                    is_tracked: true,
                }
            }
            _ => ToolReading {
                value: match self.smoothed {
                    Some(angle) => ToolValue::Scalar(angle),
                    None => ToolValue::None,
                },
                is_tracked: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_util::tracked_table;

    fn scalar(reading: ToolReading) -> f32 {
        match reading.value {
            ToolValue::Scalar(v) => v,
            other => panic!("expected scalar, got {:?}", other),
        }
    }

    #[test]
    fn relative_rotation() {
        let table = tracked_table(&[(0, 0.3, 0.3, 90.0), (1, 0.5, 0.5, 30.0)]);
        let mut dial = Dial::new(0, 1);

        let reading = dial.evaluate(&table);
        assert!(reading.is_tracked);
        assert!((scalar(reading) - 60.0).abs() < 1e-4);
    }

    #[test]
    fn rotation_wraps_mod_360() {
        // reference 10°, rotating 50° -> -40 mod 360 = 320
        let table = tracked_table(&[(0, 0.3, 0.3, 10.0), (1, 0.5, 0.5, 50.0)]);
        let mut dial = Dial::new(0, 1);
        assert!((scalar(dial.evaluate(&table)) - 320.0).abs() < 1e-4);
    }

    #[test]
    fn display_smoothing_blends_across_cycles() {
        let mut dial = Dial::new(0, 1).with_display_filter(0.5);

        let table = tracked_table(&[(0, 0.3, 0.3, 90.0), (1, 0.5, 0.5, 90.0)]);
        assert!((scalar(dial.evaluate(&table)) - 0.0).abs() < 1e-4);

        // Reference jumps to 130°: raw relative angle 40°, display
        // shows the halfway blend
        let table = tracked_table(&[(0, 0.3, 0.3, 130.0), (1, 0.5, 0.5, 90.0)]);
        assert!((scalar(dial.evaluate(&table)) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn display_smoothing_crosses_seam() {
        let mut dial = Dial::new(0, 1).with_display_filter(0.5);

        // Relative angle 359°
        let table = tracked_table(&[(0, 0.3, 0.3, 359.0), (1, 0.5, 0.5, 0.0)]);
        dial.evaluate(&table);

        // Relative angle 1°: blend takes the short way through 0
        let table = tracked_table(&[(0, 0.3, 0.3, 1.0), (1, 0.5, 0.5, 0.0)]);
        let angle = scalar(dial.evaluate(&table));
        assert!(angle < 1.0 || angle > 359.0, "got {}", angle);
    }

    #[test]
    fn occluded_dial_keeps_last_value() {
        let mut dial = Dial::new(0, 1);

        let table = tracked_table(&[(0, 0.3, 0.3, 45.0), (1, 0.5, 0.5, 0.0)]);
        let first = scalar(dial.evaluate(&table));

        // Rotating marker gone: reading keeps the angle, flag drops
        let table = tracked_table(&[(0, 0.3, 0.3, 45.0)]);
        let reading = dial.evaluate(&table);
        assert!(!reading.is_tracked);
        assert_eq!(scalar(reading), first);
    }

    #[test]
    fn never_seen_dial_reads_none() {
        let table = tracked_table(&[]);
        let mut dial = Dial::new(0, 1);

        let reading = dial.evaluate(&table);
        assert!(!reading.is_tracked);
        assert_eq!(reading.value, ToolValue::None);
    }
}
