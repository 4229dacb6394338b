//! Selection tracker: the pointer-driven rectangle state machine.
//!
//! `Idle → Selecting → Finalizing → (Idle)`. Pointer-down starts a
//! selection, every pointer-move redraws the normalized rectangle,
//! pointer-up finalizes, Escape cancels. Teardown is idempotent and clears
//! the shared activation guard exactly once.

use crate::managers::activation_guard::{ActivationGuard, ActivationGuardTrait};
use crate::types::geometry::{Point, Rect};
use crate::types::selection::{PointerEvent, SelectionPhase, TrackerResponse};

pub struct SelectionTracker {
    guard: ActivationGuard,
    phase: SelectionPhase,
    origin: Point,
    current: Point,
    cleaned_up: bool,
}

impl SelectionTracker {
    /// Starts a selection session if none is active in this context.
    /// Returns `None` when the guard is already held, so activating twice
    /// in quick succession is a no-op.
    pub fn activate(guard: ActivationGuard) -> Option<Self> {
        if !guard.try_activate() {
            return None;
        }
        Some(Self {
            guard,
            phase: SelectionPhase::Idle,
            origin: Point::default(),
            current: Point::default(),
            cleaned_up: false,
        })
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn is_torn_down(&self) -> bool {
        self.cleaned_up
    }

    /// Current normalized selection rectangle.
    pub fn selection_rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }

    /// Feeds one pointer event through the state machine.
    ///
    /// A move or up without a prior down is ignored; pointer events arrive
    /// in dispatch order so the `Selecting` check is sufficient.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> TrackerResponse {
        if self.cleaned_up {
            return TrackerResponse::None;
        }
        match event {
            PointerEvent::Down(point) => {
                if self.phase == SelectionPhase::Finalizing {
                    return TrackerResponse::None;
                }
                self.phase = SelectionPhase::Selecting;
                self.origin = point;
                self.current = point;
                TrackerResponse::Indicator(self.selection_rect())
            }
            PointerEvent::Move(point) => {
                if self.phase != SelectionPhase::Selecting {
                    return TrackerResponse::None;
                }
                self.current = point;
                TrackerResponse::Indicator(self.selection_rect())
            }
            PointerEvent::Up(point) => {
                if self.phase != SelectionPhase::Selecting {
                    return TrackerResponse::None;
                }
                self.current = point;
                self.phase = SelectionPhase::Finalizing;
                let rect = self.selection_rect();
                if rect.meets_min_selection() {
                    TrackerResponse::Capture(rect)
                } else {
                    // Too small to be intentional; discard silently.
                    TrackerResponse::Dismiss
                }
            }
            PointerEvent::Escape => TrackerResponse::Dismiss,
        }
    }

    /// Tears the session down. Idempotent: the first call releases the
    /// guard and returns true, every later call is a no-op returning false.
    pub fn teardown(&mut self) -> bool {
        if self.cleaned_up {
            return false;
        }
        self.cleaned_up = true;
        self.guard.release();
        true
    }
}

impl Drop for SelectionTracker {
    fn drop(&mut self) {
        // A dropped tracker must not leave the guard held.
        self.teardown();
    }
}
