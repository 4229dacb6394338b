//! Snipsight UI layer.
//!
//! All visible surfaces (overlay, selection indicator, result popup, and
//! toasts) are markup produced by pure Rust functions and mutated through
//! the declarative [`dom::DomCommand`] set. The `gui` feature adds the
//! `wry` + `tao` host window that executes those commands in a webview.

pub mod dom;
pub mod overlay;
pub mod popup;
pub mod toast;

#[cfg(feature = "gui")]
pub mod overlay_app;
