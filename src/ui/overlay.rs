//! Overlay renderer: the transparent capture surface and the selection
//! indicator.
//!
//! A stateless-between-calls factory. Mounting appends the two nodes and
//! injects one shared animated-border style definition (idempotent, keyed
//! by [`RAINBOW_STYLE_ID`]); disposal removes whatever was attached and is
//! safe to call when nothing ever was.

use crate::types::geometry::Rect;
use crate::ui::dom::DomCommand;

pub const OVERLAY_ID: &str = "snipsight-overlay";
pub const SELECTION_ID: &str = "snipsight-selection";
pub const RAINBOW_STYLE_ID: &str = "snipsight-rainbow-style";

const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100vw; height: 100vh; \
    background: transparent; cursor: crosshair; z-index: 999999; pointer-events: all;";

const SELECTION_BASE_STYLE: &str = "position: fixed; pointer-events: none; z-index: 1000000; \
    border-radius: 4px; background: rgba(0, 150, 255, 0.05); box-shadow: 0 0 0 1px red; \
    animation: snipsight-rainbow-border 2s linear infinite;";

const RAINBOW_CSS: &str = "@keyframes snipsight-rainbow-border {\n\
    0% { box-shadow: 0 0 0 1px red; }\n\
    14% { box-shadow: 0 0 0 1px orange; }\n\
    28% { box-shadow: 0 0 0 1px yellow; }\n\
    42% { box-shadow: 0 0 0 1px green; }\n\
    57% { box-shadow: 0 0 0 1px cyan; }\n\
    71% { box-shadow: 0 0 0 1px blue; }\n\
    85% { box-shadow: 0 0 0 1px violet; }\n\
    100% { box-shadow: 0 0 0 1px red; }\n\
}";

/// Markup for the capture surface.
pub fn overlay_html() -> String {
    format!("<div id=\"{}\" style=\"{}\"></div>", OVERLAY_ID, OVERLAY_STYLE)
}

/// Markup for the selection indicator, initially hidden.
pub fn indicator_html() -> String {
    format!(
        "<div id=\"{}\" style=\"{} display: none;\"></div>",
        SELECTION_ID, SELECTION_BASE_STYLE
    )
}

/// Inline style placing the visible indicator over the given rectangle.
pub fn indicator_style(rect: Rect) -> String {
    format!(
        "{} display: block; left: {}px; top: {}px; width: {}px; height: {}px;",
        SELECTION_BASE_STYLE, rect.x, rect.y, rect.width, rect.height
    )
}

/// Overlay renderer owned by the active selection session.
pub struct OverlayRenderer {
    mounted: bool,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self { mounted: false }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Commands mounting the capture surface, the hidden indicator, and the
    /// shared border animation.
    pub fn mount(&mut self) -> Vec<DomCommand> {
        self.mounted = true;
        vec![
            DomCommand::EnsureStyle {
                id: RAINBOW_STYLE_ID.to_string(),
                css: RAINBOW_CSS.to_string(),
            },
            DomCommand::Append {
                html: overlay_html(),
            },
            DomCommand::Append {
                html: indicator_html(),
            },
        ]
    }

    /// Commands redrawing the indicator over the current rectangle.
    pub fn indicator_update(&self, rect: Rect) -> Vec<DomCommand> {
        vec![DomCommand::SetStyle {
            id: SELECTION_ID.to_string(),
            css: indicator_style(rect),
        }]
    }

    /// Commands hiding both nodes so they are absent from the screenshot.
    pub fn hide_all(&self) -> Vec<DomCommand> {
        vec![
            DomCommand::Hide {
                id: OVERLAY_ID.to_string(),
            },
            DomCommand::Hide {
                id: SELECTION_ID.to_string(),
            },
        ]
    }

    /// Commands removing both nodes. Empty when nothing was mounted, so
    /// disposal is safe on a renderer that never attached.
    pub fn dispose(&mut self) -> Vec<DomCommand> {
        if !self.mounted {
            return Vec::new();
        }
        self.mounted = false;
        vec![
            DomCommand::Remove {
                id: OVERLAY_ID.to_string(),
            },
            DomCommand::Remove {
                id: SELECTION_ID.to_string(),
            },
        ]
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new()
    }
}
