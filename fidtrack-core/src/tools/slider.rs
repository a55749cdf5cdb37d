//! Linear slider tool
//!
//! Three markers: a reference at each end of the track and one on the
//! knob. The value is the knob's projection onto the start→end axis,
//! normalized by track length and clamped to [0, 1].
//!
//! The track length is measured and cached whenever both references
//! are visible. When only one reference is visible, the other end is
//! reconstructed from that marker's own orientation and the cached
//! length - end markers are mounted with their angle pointing along
//! the track toward the end reference, so a lost start reference costs
//! nothing as long as the length is known.

use crate::markers::{MarkerState, MarkerTable};
use crate::tools::{direction, Point, ToolReading, ToolValue};

/// Tracks shorter than this are degenerate and never cached
const MIN_TRACK_LENGTH: f32 = 1e-4;

/// Slider interpreter
pub struct Slider {
    start_id: usize,
    end_id: usize,
    knob_id: usize,
    cached_length: Option<f32>,
}

impl Slider {
    /// Slider over `start_id`→`end_id` with the knob on `knob_id`
    pub fn new(start_id: usize, end_id: usize, knob_id: usize) -> Self {
        Self {
            start_id,
            end_id,
            knob_id,
            cached_length: None,
        }
    }

    /// Seed the track length ahead of the first both-ends sighting
    ///
    /// Installations that know their physical track length can start
    /// reconstructing from a single reference immediately.
    pub fn with_track_length(mut self, length: f32) -> Self {
        if length > MIN_TRACK_LENGTH {
            self.cached_length = Some(length);
        }
        self
    }

    /// Currently cached track length, if any
    pub fn track_length(&self) -> Option<f32> {
        self.cached_length
    }

    /// Derive the slider value from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let start = visible(table, self.start_id);
        let end = visible(table, self.end_id);
        let knob = visible(table, self.knob_id);

        let is_tracked = (start.is_some() || end.is_some()) && knob.is_some();

        // Re-measure whenever both references are in view
        if let (Some(s), Some(e)) = (start, end) {
            let length = Point::new(s.x, s.y).distance_to(Point::new(e.x, e.y));
            if length > MIN_TRACK_LENGTH {
                self.cached_length = Some(length);
            }
        }

        let value = match (self.resolve_track(start, end), knob) {
            (Some(track), Some(k)) => {
                let along = (k.x - track.origin.x) * track.axis.0
                    + (k.y - track.origin.y) * track.axis.1;
                ToolValue::Scalar((along / track.length).clamp(0.0, 1.0))
            }
            _ => ToolValue::None,
        };

        ToolReading { value, is_tracked }
    }

    /// Work out where the track lies from whichever references are
    /// visible; `None` when the geometry is unknowable this cycle
    fn resolve_track(
        &self,
        start: Option<&MarkerState>,
        end: Option<&MarkerState>,
    ) -> Option<Track> {
        match (start, end) {
            (Some(s), Some(e)) => {
                let dx = e.x - s.x;
                let dy = e.y - s.y;
                let length = libm::sqrtf(dx * dx + dy * dy);
                if length <= MIN_TRACK_LENGTH {
                    return None;
                }
                Some(Track {
                    origin: Point::new(s.x, s.y),
                    axis: (dx / length, dy / length),
                    length,
                })
            }
            (None, Some(e)) => {
                // Project backward along the end marker's orientation
                let length = self.cached_length?;
                let axis = direction(e.angle);
                Some(Track {
                    origin: Point::new(e.x - axis.0 * length, e.y - axis.1 * length),
                    axis,
                    length,
                })
            }
            (Some(s), None) => {
                // Mirror case: project forward from the start marker
                let length = self.cached_length?;
                Some(Track {
                    origin: Point::new(s.x, s.y),
                    axis: direction(s.angle),
                    length,
                })
            }
            (None, None) => None,
        }
    }
}

struct Track {
    origin: Point,
    axis: (f32, f32),
    length: f32,
}

fn visible(table: &MarkerTable, id: usize) -> Option<&MarkerState> {
    table.get(id).filter(|state| state.is_visible())
}
