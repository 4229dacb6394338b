//! Per-context activation guard.
//!
//! The single piece of shared mutable state: a flag ensuring at most one
//! selection session is active in a page context. Set on activation,
//! cleared on teardown, no other reader or writer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait defining the activation guard operations.
pub trait ActivationGuardTrait {
    /// Claims the guard. Returns false when a session is already active.
    fn try_activate(&self) -> bool;
    /// Releases the guard. Safe to call when not held.
    fn release(&self);
    fn is_active(&self) -> bool;
}

/// Shared activation flag for one page context. Clones refer to the same
/// underlying flag.
#[derive(Clone, Default)]
pub struct ActivationGuard {
    active: Arc<AtomicBool>,
}

impl ActivationGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivationGuardTrait for ActivationGuard {
    fn try_activate(&self) -> bool {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
