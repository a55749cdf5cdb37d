//! Two-state toggle tool
//!
//! A flip tangible with one marker per side; whichever side faces the
//! camera names the state. Both sides visible at once means the
//! physical object is somewhere it should not be (standing on edge,
//! two tangibles on the table) - that ambiguity is surfaced to the
//! exhibit, never silently resolved.

use crate::markers::MarkerTable;
use crate::tools::{ToolReading, ToolValue};

/// Toggle interpreter
pub struct Toggle {
    a_id: usize,
    b_id: usize,
    a_label: &'static str,
    b_label: &'static str,
}

impl Toggle {
    /// Toggle between side `a` and side `b`
    pub fn new(a_id: usize, a_label: &'static str, b_id: usize, b_label: &'static str) -> Self {
        Self {
            a_id,
            b_id,
            a_label,
            b_label,
        }
    }

    /// Derive the toggle state from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let a = table.is_visible(self.a_id);
        let b = table.is_visible(self.b_id);

        let value = match (a, b) {
            (true, true) => ToolValue::BothLabels(self.a_label, self.b_label),
            (true, false) => ToolValue::Label(self.a_label),
            (false, true) => ToolValue::Label(self.b_label),
            (false, false) => ToolValue::None,
        };

        ToolReading {
            value,
            is_tracked: a || b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_util::tracked_table;

    fn toggle() -> Toggle {
        Toggle::new(0, "A", 1, "B")
    }

    #[test]
    fn side_a_visible() {
        let table = tracked_table(&[(0, 0.5, 0.5, 0.0)]);
        let reading = toggle().evaluate(&table);
        assert!(reading.is_tracked);
        assert_eq!(reading.value, ToolValue::Label("A"));
    }

    #[test]
    fn side_b_visible() {
        let table = tracked_table(&[(1, 0.5, 0.5, 0.0)]);
        let reading = toggle().evaluate(&table);
        assert!(reading.is_tracked);
        assert_eq!(reading.value, ToolValue::Label("B"));
    }

    #[test]
    fn both_sides_surface_ambiguity() {
        let table = tracked_table(&[(0, 0.4, 0.5, 0.0), (1, 0.6, 0.5, 0.0)]);
        let reading = toggle().evaluate(&table);

        // Still tracked - the object is clearly on the table - but the
        // ambiguous state is reported as-is
        assert!(reading.is_tracked);
        assert_eq!(reading.value, ToolValue::BothLabels("A", "B"));
        assert_eq!(format!("{}", reading.value), "A and B");
    }

    #[test]
    fn neither_side_is_untracked() {
        let table = tracked_table(&[]);
        let reading = toggle().evaluate(&table);
        assert!(!reading.is_tracked);
        assert_eq!(reading.value, ToolValue::None);
    }
}
