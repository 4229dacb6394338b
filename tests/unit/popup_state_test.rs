//! Unit tests for the popup interaction state machine: the three opacity
//! tiers with the two-stage fade, and header dragging with viewport
//! clamping.

use snipsight::types::geometry::{Point, Size};
use snipsight::types::popup::{OpacityTier, PopupEvent};
use snipsight::ui::popup::{clamp_to_viewport, PopupInteraction};

fn popup() -> PopupInteraction {
    PopupInteraction::new(Point::new(100.0, 100.0))
}

fn drag_move(pointer: Point) -> PopupEvent {
    PopupEvent::DragMove {
        pointer,
        popup_size: Size::new(400.0, 300.0),
        viewport: Size::new(1280.0, 800.0),
    }
}

#[test]
fn test_mounts_dimmed() {
    assert_eq!(popup().tier(), OpacityTier::Dimmed);
}

#[test]
fn test_hover_enter_focuses() {
    let mut p = popup();
    p.handle(PopupEvent::HoverEnter);
    assert_eq!(p.tier(), OpacityTier::Focused);
}

/// The first leave only dims; full transparency needs a second visit.
#[test]
fn test_first_leave_dims() {
    let mut p = popup();
    p.handle(PopupEvent::HoverEnter);
    p.handle(PopupEvent::HoverLeave);
    assert_eq!(p.tier(), OpacityTier::Dimmed);
}

#[test]
fn test_second_leave_fades() {
    let mut p = popup();
    p.handle(PopupEvent::HoverEnter);
    p.handle(PopupEvent::HoverLeave);
    p.handle(PopupEvent::HoverEnter);
    assert_eq!(p.tier(), OpacityTier::Focused);
    p.handle(PopupEvent::HoverLeave);
    assert_eq!(p.tier(), OpacityTier::Faded);
}

/// A faded popup still revives on hover, and fades again on leave.
#[test]
fn test_faded_popup_revives_on_hover() {
    let mut p = popup();
    for _ in 0..2 {
        p.handle(PopupEvent::HoverEnter);
        p.handle(PopupEvent::HoverLeave);
    }
    assert_eq!(p.tier(), OpacityTier::Faded);

    p.handle(PopupEvent::HoverEnter);
    assert_eq!(p.tier(), OpacityTier::Focused);
    p.handle(PopupEvent::HoverLeave);
    assert_eq!(p.tier(), OpacityTier::Faded);
}

/// Dragging keeps the pointer's grab offset: the popup moves with the
/// pointer, not to it.
#[test]
fn test_drag_preserves_grab_offset() {
    let mut p = popup();
    p.handle(PopupEvent::DragStart {
        pointer: Point::new(150.0, 120.0),
    });
    assert!(p.is_dragging());

    p.handle(drag_move(Point::new(350.0, 420.0)));
    assert_eq!(p.position(), Point::new(300.0, 400.0));

    p.handle(PopupEvent::DragEnd);
    assert!(!p.is_dragging());
}

/// A move without a preceding drag start does not move the popup.
#[test]
fn test_move_without_drag_start_is_ignored() {
    let mut p = popup();
    p.handle(drag_move(Point::new(700.0, 700.0)));
    assert_eq!(p.position(), Point::new(100.0, 100.0));
}

/// Positions clamp to the viewport so the panel can never be dragged
/// off-screen.
#[test]
fn test_drag_clamps_to_viewport() {
    let mut p = popup();
    p.handle(PopupEvent::DragStart {
        pointer: Point::new(100.0, 100.0),
    });

    p.handle(drag_move(Point::new(-500.0, -500.0)));
    assert_eq!(p.position(), Point::new(0.0, 0.0));

    p.handle(drag_move(Point::new(5000.0, 5000.0)));
    assert_eq!(p.position(), Point::new(880.0, 500.0));
}

/// A popup larger than the viewport pins to the origin instead of
/// producing a negative clamp range.
#[test]
fn test_clamp_with_oversized_popup() {
    let clamped = clamp_to_viewport(
        Point::new(50.0, 50.0),
        Size::new(900.0, 900.0),
        Size::new(800.0, 600.0),
    );
    assert_eq!(clamped, Point::new(0.0, 0.0));
}

/// The style string reflects the tier and drag state.
#[test]
fn test_style_reflects_state() {
    let mut p = popup();
    assert!(p.style().contains("opacity: 0.15"));
    assert!(p.style().contains("transition: all 0.3s ease"));

    p.handle(PopupEvent::HoverEnter);
    assert!(p.style().contains("opacity: 1"));

    p.handle(PopupEvent::DragStart {
        pointer: Point::new(100.0, 100.0),
    });
    assert!(p.style().contains("transition: none"));
    assert!(p.style().contains("cursor: grabbing"));
}
