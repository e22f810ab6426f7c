#![forbid(unsafe_code)]

//! Pointer input and the drag gestures recognized from it.
//!
//! Coordinates are list-local: `y == 0.0` is the top edge of the first row,
//! in the same unit the host reports row heights in.
//!
//! # Invariants
//!
//! Every drag sequence is well-formed: `DragStart` → zero or more
//! `DragMove` → exactly one of `DragEnd` or `DragCancel`.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position in list-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Phase of a single-pointer (touch or mouse) interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// The platform took the pointer away (system gesture, incoming call).
    Cancel,
}

/// A raw pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            pos: Point::new(x, y),
        }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    #[must_use]
    pub const fn cancel() -> Self {
        Self::new(PointerKind::Cancel, 0.0, 0.0)
    }
}

/// Input delivered to the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Pointer(PointerEvent),
    /// App moved to foreground (`true`) or background (`false`).
    Focus(bool),
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

// ---------------------------------------------------------------------------
// Recognized gestures
// ---------------------------------------------------------------------------

/// High-level gesture recognized from raw pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// Pointer went down and up without becoming a drag.
    Tap { pos: Point },
    /// Pointer held still past the long-press threshold.
    LongPress { pos: Point, duration: Duration },
    /// A drag began at `origin`.
    DragStart { origin: Point },
    /// The pointer moved during a drag.
    DragMove {
        origin: Point,
        current: Point,
        delta: (f64, f64),
    },
    /// The pointer was released during a drag.
    DragEnd { origin: Point, end: Point },
    /// The drag was abandoned.
    DragCancel,
}

impl GestureEvent {
    /// Whether this event belongs to a drag sequence.
    #[must_use]
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::DragStart { .. } | Self::DragMove { .. } | Self::DragEnd { .. } | Self::DragCancel
        )
    }
}
