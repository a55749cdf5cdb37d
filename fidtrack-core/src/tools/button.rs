//! Push button tool
//!
//! Two markers: a reference that is always in view next to the
//! button, and a press marker that the mechanism physically covers
//! while the button is held down. Absence of the press marker *is*
//! the press signal, so this tool only makes sense while the
//! reference confirms the rig itself is visible.

use crate::markers::MarkerTable;
use crate::tools::{ToolReading, ToolValue};

/// Press state derived from marker occlusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Press marker occluded: button held down
    Pressed,
    /// Press marker visible: button released
    Released,
}

impl core::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed down"),
            Self::Released => write!(f, "up"),
        }
    }
}

/// Button interpreter
pub struct Button {
    reference_id: usize,
    press_id: usize,
}

impl Button {
    /// Button with `reference_id` beside it and `press_id` under the cap
    pub fn new(reference_id: usize, press_id: usize) -> Self {
        Self {
            reference_id,
            press_id,
        }
    }

    /// Derive the press state from the table
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        let state = if table.is_visible(self.press_id) {
            ButtonState::Released
        } else {
            ButtonState::Pressed
        };

        ToolReading {
            value: ToolValue::Button(state),
            is_tracked: table.is_visible(self.reference_id),
        }
    }
}
