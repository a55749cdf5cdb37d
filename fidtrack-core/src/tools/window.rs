//! Window region tool
//!
//! Four corner markers framing a region of the table - a picture
//! frame the visitor slides around to select what a second display
//! magnifies. The region only exists when all four corners are
//! visible; a partial frame would shear unpredictably.

use crate::markers::MarkerTable;
use crate::tools::{Point, Quad, ToolReading, ToolValue};

/// Window interpreter
pub struct Window {
    corner_ids: [usize; 4],
}

impl Window {
    /// Window framed by four corner markers
    pub fn new(corner_ids: [usize; 4]) -> Self {
        Self { corner_ids }
    }

    /// Derive the framed region from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let mut corners = [Point::default(); 4];
        for (slot, &id) in corners.iter_mut().zip(&self.corner_ids) {
            match table.get(id).filter(|s| s.is_visible()) {
                Some(state) => *slot = Point::new(state.x, state.y),
                None => return ToolReading::absent(),
            }
        }

        ToolReading {
            value: ToolValue::Quad(Quad { corners }),
            is_tracked: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_util::tracked_table;

    #[test]
    fn all_corners_form_quad() {
        let table = tracked_table(&[
            (0, 0.2, 0.2, 0.0),
            (1, 0.8, 0.2, 0.0),
            (2, 0.8, 0.8, 0.0),
            (3, 0.2, 0.8, 0.0),
        ]);
        let reading = Window::new([0, 1, 2, 3]).evaluate(&table);

        assert!(reading.is_tracked);
        match reading.value {
            ToolValue::Quad(quad) => {
                assert_eq!(quad.corners[0], Point::new(0.2, 0.2));
                assert_eq!(quad.corners[2], Point::new(0.8, 0.8));
            }
            other => panic!("expected quad, got {:?}", other),
        }
    }

    #[test]
    fn missing_corner_is_untracked() {
        let table = tracked_table(&[
            (0, 0.2, 0.2, 0.0),
            (1, 0.8, 0.2, 0.0),
            (2, 0.8, 0.8, 0.0),
        ]);
        let reading = Window::new([0, 1, 2, 3]).evaluate(&table);

        assert!(!reading.is_tracked);
        assert_eq!(reading.value, ToolValue::None);
    }
}
