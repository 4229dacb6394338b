use crate::types::geometry::{Point, Rect};

/// Phase of a selection session.
///
/// `Idle` is the mounted-but-untouched overlay, `Selecting` runs from
/// pointer-down to pointer-up, and `Finalizing` covers the capture handoff
/// after a valid pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Selecting,
    Finalizing,
}

/// A pointer or keyboard event delivered to the selection tracker, already
/// translated from the host's native event representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Escape,
}

/// What the tracker wants the session to do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerResponse {
    /// Nothing to do (event ignored in the current phase).
    None,
    /// Show the selection indicator with the given geometry.
    Indicator(Rect),
    /// The selection was finalized and passed the size threshold: run the
    /// capture pipeline for this rectangle, then tear the session down.
    Capture(Rect),
    /// Tear the session down now (Escape, or a selection below the
    /// size threshold).
    Dismiss,
}
