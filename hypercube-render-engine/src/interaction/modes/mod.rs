//! Closed mode sets, one per input category.
//!
//! Every variant owns its private state. The router replaces the whole variant
//! on selection, so nothing carries over from one strategy to the next.

/// Click/tap modes: burst and ripple.
pub mod click;

/// Pointer-move modes: rotation, velocity and distance.
pub mod pointer;

/// Scroll modes: geometry cycling and colour sweep.
pub mod scroll;

pub use click::ClickMode;
pub use pointer::PointerMode;
pub use scroll::ScrollMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCategory {
    PointerMove,
    Click,
    Scroll,
}

impl InputCategory {
    pub const ALL: [InputCategory; 3] = [
        InputCategory::PointerMove,
        InputCategory::Click,
        InputCategory::Scroll,
    ];

    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pointer" | "pointer_move" | "pointermove" | "move" | "mouse" => Some(Self::PointerMove),
            "click" | "tap" => Some(Self::Click),
            "scroll" | "wheel" => Some(Self::Scroll),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerMove => "pointer",
            Self::Click => "click",
            Self::Scroll => "scroll",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::PointerMove => 0,
            Self::Click => 1,
            Self::Scroll => 2,
        }
    }
}
