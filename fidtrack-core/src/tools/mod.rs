//! Tangible tool interpreters
//!
//! A tool is a physical object on the table built from one or more
//! markers: a slider knob between two reference markers, a dial, a
//! cube with one marker per face. Every cycle, after the table has
//! settled, each tool reads the states of its markers and derives a
//! control value plus an `is_tracked` flag.
//!
//! Tools treat a marker as present when it is `Tracked` *or*
//! `Inferred` - occlusion inference exists so a hand briefly covering
//! a marker does not make the exhibit flicker.
//!
//! One enum, one operation:
//!
//! ```rust
//! use fidtrack_core::{MarkerTable, TrackingConfig};
//! use fidtrack_core::tools::{MarkerTool, Slider};
//!
//! let mut tool = MarkerTool::Slider(Slider::new(0, 1, 2));
//! let table = MarkerTable::new(TrackingConfig::default());
//! let reading = tool.evaluate(&table);
//! assert!(!reading.is_tracked);
//! ```
//!
//! Some tools carry private state across cycles (the slider caches
//! its track length, the dial smooths its display angle), which is
//! why `evaluate` takes `&mut self`.

mod button;
mod dial;
mod dice;
mod object;
mod slider;
mod toggle;
mod window;

pub use button::{Button, ButtonState};
pub use dial::Dial;
pub use dice::Dice;
pub use object::ObjectTool;
pub use slider::Slider;
pub use toggle::Toggle;
pub use window::Window;

use crate::markers::MarkerTable;

/// Most marker ids a single tool can reference
pub const MAX_TOOL_MARKERS: usize = 8;

/// A 2D point in normalized tracking-area coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Normalized x
    pub x: f32,
    /// Normalized y
    pub y: f32,
}

impl Point {
    /// Construct from coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Quadrilateral of four corner points, in corner-id order
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quad {
    /// The four corners
    pub corners: [Point; 4],
}

/// The value a tool derived this cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolValue {
    /// Nothing derivable this cycle
    None,
    /// Slider position in [0, 1], or dial angle in degrees
    Scalar(f32),
    /// Toggle side or dice face label
    Label(&'static str),
    /// Both toggle sides visible at once - ambiguous, surfaced as-is
    BothLabels(&'static str, &'static str),
    /// Button press state
    Button(ButtonState),
    /// Window corner positions
    Quad(Quad),
    /// Object centroid
    Point(Point),
}

impl core::fmt::Display for ToolValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Scalar(v) => write!(f, "{:.3}", v),
            Self::Label(label) => write!(f, "{}", label),
            Self::BothLabels(a, b) => write!(f, "{} and {}", a, b),
            Self::Button(state) => write!(f, "{}", state),
            Self::Quad(quad) => write!(
                f,
                "({:.3}, {:.3}) ({:.3}, {:.3}) ({:.3}, {:.3}) ({:.3}, {:.3})",
                quad.corners[0].x, quad.corners[0].y,
                quad.corners[1].x, quad.corners[1].y,
                quad.corners[2].x, quad.corners[2].y,
                quad.corners[3].x, quad.corners[3].y,
            ),
            Self::Point(p) => write!(f, "({:.3}, {:.3})", p.x, p.y),
        }
    }
}

/// What a tool read from the table this cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolReading {
    /// Derived value, [`ToolValue::None`] when not derivable
    pub value: ToolValue,
    /// Whether the tool's required markers were visible
    pub is_tracked: bool,
}

impl ToolReading {
    /// Reading for a tool whose markers are absent
    pub const fn absent() -> Self {
        Self {
            value: ToolValue::None,
            is_tracked: false,
        }
    }
}

/// Any tangible tool, one variant per kind
///
/// Exhibit code builds the variants it needs and evaluates them each
/// cycle after `apply_frame` has settled the table.
pub enum MarkerTool {
    /// Linear slider: two reference markers and a knob
    Slider(Slider),
    /// Rotary dial: reference marker and rotating marker
    Dial(Dial),
    /// Two-state flip object
    Toggle(Toggle),
    /// Press-to-occlude push button
    Button(Button),
    /// Cube with one marker per face
    Dice(Dice),
    /// Four-corner region
    Window(Window),
    /// Rigid tangible carrying several markers
    Object(ObjectTool),
}

impl MarkerTool {
    /// Read the tool's markers and derive this cycle's value
    pub fn evaluate(&mut self, table: &MarkerTable) -> ToolReading {
        match self {
            Self::Slider(tool) => tool.evaluate(table),
            Self::Dial(tool) => tool.evaluate(table),
            Self::Toggle(tool) => tool.evaluate(table),
            Self::Button(tool) => tool.evaluate(table),
            Self::Dice(tool) => tool.evaluate(table),
            Self::Window(tool) => tool.evaluate(table),
            Self::Object(tool) => tool.evaluate(table),
        }
    }

    /// Short name of the tool kind, for logs and overlays
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Slider(_) => "slider",
            Self::Dial(_) => "dial",
            Self::Toggle(_) => "toggle",
            Self::Button(_) => "button",
            Self::Dice(_) => "dice",
            Self::Window(_) => "window",
            Self::Object(_) => "object",
        }
    }
}

/// Unit direction of a marker angle, degrees to (cos, sin)
pub(crate) fn direction(angle_degrees: f32) -> (f32, f32) {
    let radians = angle_degrees * core::f32::consts::PI / 180.0;
    (libm::cosf(radians), libm::sinf(radians))
}
