//! Rigid object tool
//!
//! One tangible carrying several markers so it survives partial
//! occlusion: a model building with a marker on each corner of its
//! base. The object is present while any of its markers is, and its
//! position is the centroid of whichever markers are visible right
//! now.

use heapless::Vec;

use crate::markers::MarkerTable;
use crate::tools::{Point, ToolReading, ToolValue, MAX_TOOL_MARKERS};

/// Rigid object interpreter
pub struct ObjectTool {
    ids: Vec<usize, MAX_TOOL_MARKERS>,
}

impl ObjectTool {
    /// Object carrying the given marker ids
    ///
    /// At most [`MAX_TOOL_MARKERS`] ids are kept; extra entries are
    /// ignored.
    pub fn new(ids: &[usize]) -> Self {
        let mut kept = Vec::new();
        for &id in ids.iter().take(MAX_TOOL_MARKERS) {
            // Bounded by take(); push cannot fail
            let _ = kept.push(id);
        }
        Self { ids: kept }
    }

    /// Derive the object position from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut visible = 0usize;

        for &id in &self.ids {
            if let Some(state) = table.get(id).filter(|s| s.is_visible()) {
                sum_x += state.x;
                sum_y += state.y;
                visible += 1;
            }
        }

        if visible == 0 {
            return ToolReading::absent();
        }

        ToolReading {
            value: ToolValue::Point(Point::new(
                sum_x / visible as f32,
                sum_y / visible as f32,
            )),
            is_tracked: true,
        }
    }
}
