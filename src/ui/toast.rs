//! Transient toast notifications.

use std::sync::Arc;

use uuid::Uuid;

use crate::ui::dom::{html_escape, DomCommand, DomSink};

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u64 = 3000;

const BASE_STYLE: &str = "position: fixed; top: 20px; right: 20px; padding: 12px 20px; \
    color: white; border-radius: 4px; z-index: 1000001; font-family: Arial, sans-serif; \
    font-size: 14px; box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3);";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn background(&self) -> &'static str {
        match self {
            ToastKind::Success => "#4caf50",
            ToastKind::Error => "#f44336",
        }
    }
}

/// Markup for one toast node.
pub fn toast_html(id: &str, text: &str, kind: ToastKind) -> String {
    format!(
        "<div id=\"{}\" style=\"{} background: {};\">{}</div>",
        id,
        BASE_STYLE,
        kind.background(),
        html_escape(text)
    )
}

/// Trait defining the toast operation the pipelines need.
pub trait ToastSinkTrait: Send + Sync {
    fn show(&self, text: &str, kind: ToastKind);
}

/// Toast sink that renders into the host surface via DOM commands.
pub struct DomToastSink {
    dom: Arc<dyn DomSink>,
}

impl DomToastSink {
    pub fn new(dom: Arc<dyn DomSink>) -> Self {
        Self { dom }
    }
}

impl ToastSinkTrait for DomToastSink {
    fn show(&self, text: &str, kind: ToastKind) {
        let id = format!("snipsight-toast-{}", Uuid::new_v4());
        self.dom.apply(&[
            DomCommand::Append {
                html: toast_html(&id, text, kind),
            },
            DomCommand::RemoveAfter {
                id,
                delay_ms: TOAST_DURATION_MS,
            },
        ]);
    }
}
