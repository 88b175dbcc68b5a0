//! Pointer events delivered by the host to a button.

use crate::render::Point;

/// Single-finger pointer event. Points are in the host node's parent
/// coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Up(Point),
    Cancel,
}

impl PointerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down(_) => "down",
            Self::Up(_) => "up",
            Self::Cancel => "cancel",
        }
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Down(p) | Self::Up(p) => Some(*p),
            Self::Cancel => None,
        }
    }
}
