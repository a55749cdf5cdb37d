//! Dice tool
//!
//! A cube (or any die) with one marker per face; the face toward the
//! camera names the roll. Exactly one face visible is the only sound
//! state - zero means the die is off the table or mid-roll, more than
//! one means reflections or a second die, and both degrade the
//! reading rather than guess.

use heapless::Vec;

use crate::markers::MarkerTable;
use crate::tools::{ToolReading, ToolValue, MAX_TOOL_MARKERS};

/// Dice interpreter
pub struct Dice {
    faces: Vec<(usize, &'static str), MAX_TOOL_MARKERS>,
}

impl Dice {
    /// Die with the given `(marker id, face label)` pairs
    ///
    /// At most [`MAX_TOOL_MARKERS`] faces are kept; extra entries are
    /// ignored.
    pub fn new(faces: &[(usize, &'static str)]) -> Self {
        let mut kept = Vec::new();
        for &face in faces.iter().take(MAX_TOOL_MARKERS) {
            // Bounded by take(); push cannot fail
            let _ = kept.push(face);
        }
        Self { faces: kept }
    }

    /// Number of configured faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Derive the visible face from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let mut visible = None;
        let mut visible_count = 0;

        for &(id, label) in &self.faces {
            if table.is_visible(id) {
                visible_count += 1;
                visible = Some(label);
            }
        }

        if visible_count == 1 {
            ToolReading {
                value: ToolValue::Label(visible.unwrap_or("")),
                is_tracked: true,
            }
        } else {
            // Zero or several faces: ambiguous, no value
            ToolReading::absent()
        }
    }
}
