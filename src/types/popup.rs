use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::geometry::{Point, Size};

/// Opacity/scale tier of the result popup.
///
/// The popup mounts `Dimmed`, becomes `Focused` while hovered, returns to
/// `Dimmed` after the first leave, and only reaches `Faded` (fully
/// transparent) after the pointer has entered and left a second time, so one
/// accidental hover does not banish it permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpacityTier {
    Dimmed,
    Focused,
    Faded,
}

/// Interaction events delivered to a mounted popup, translated from the
/// host's native events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupEvent {
    HoverEnter,
    HoverLeave,
    DragStart {
        pointer: Point,
    },
    /// Pointer moved while dragging. The host measures the popup and the
    /// viewport at event time so clamping uses current dimensions.
    DragMove {
        pointer: Point,
        popup_size: Size,
        viewport: Size,
    },
    DragEnd,
    Close,
}

/// Static description of a popup to mount: identity, anchor position, and
/// the localized chrome strings.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub id: Uuid,
    pub position: Point,
    pub title: String,
    pub loading_text: String,
    pub close_label: String,
}
