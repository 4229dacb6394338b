//! Result popup: floating panel, hover fade, dragging, and rendering.
//!
//! The state machine ([`PopupInteraction`]) and the presentation (pure
//! `render_*` functions over [`AnalysisOutcome`]) are deliberately separate
//! so each is testable on its own. [`PopupManager`] glues them to the host
//! surface and owns the per-popup close tokens.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::services::localization_engine::Translator;
use crate::types::analysis::{AnalysisOutcome, AnswerPayload, AnswerType, ResultItem};
use crate::types::geometry::{Point, Size};
use crate::types::popup::{OpacityTier, PopupEvent, PopupView};
use crate::ui::dom::{html_escape, DomCommand, DomSink};

const POPUP_BASE_STYLE: &str = "position: fixed; width: 400px; min-width: 300px; \
    max-width: 800px; background: white; border-radius: 12px; padding: 0; \
    z-index: 1000002; font-family: Arial, sans-serif; resize: both; overflow: hidden;";

const HEADER_STYLE: &str = "padding: 15px 20px; \
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); \
    border-radius: 12px 12px 0 0; cursor: move; user-select: none;";

const CONTENT_STYLE: &str = "padding: 20px; max-height: 400px; overflow-y: auto;";

const CLOSE_BUTTON_STYLE: &str = "background: #4285f4; color: white; border: none; \
    padding: 8px 16px; border-radius: 6px; cursor: pointer; font-size: 14px; width: 100%;";

const WARNING_BANNER_STYLE: &str = "background: #fff7ed; border-left: 4px solid #f59e0b; \
    padding: 12px; border-radius: 6px; margin-bottom: 12px;";

const RAW_BLOCK_STYLE: &str = "background: #f8fafc; border: 1px solid #cbd5e1; padding: 12px; \
    border-radius: 6px;";

pub fn popup_root_id(id: Uuid) -> String {
    format!("snip-popup-{}", id)
}

pub fn popup_header_id(id: Uuid) -> String {
    format!("snip-popup-header-{}", id)
}

pub fn popup_loading_id(id: Uuid) -> String {
    format!("snip-loading-{}", id)
}

pub fn popup_result_id(id: Uuid) -> String {
    format!("snip-result-{}", id)
}

pub fn popup_close_id(id: Uuid) -> String {
    format!("snip-close-{}", id)
}

/// Inline style for the popup root at a given position and tier.
pub fn popup_style(position: Point, tier: OpacityTier, dragging: bool) -> String {
    let (opacity, transform, shadow) = match tier {
        OpacityTier::Focused => ("1", "scale(1)", "0 8px 32px rgba(0,0,0,0.4)"),
        OpacityTier::Dimmed => ("0.15", "scale(0.8)", "0 2px 12px rgba(0,0,0,0.2)"),
        OpacityTier::Faded => ("0", "scale(0.7)", "none"),
    };
    let (transition, cursor) = if dragging {
        ("none", "grabbing")
    } else {
        ("all 0.3s ease", "move")
    };
    format!(
        "{} left: {}px; top: {}px; opacity: {}; transform: {}; box-shadow: {}; \
         transition: {}; cursor: {};",
        POPUP_BASE_STYLE, position.x, position.y, opacity, transform, shadow, transition, cursor
    )
}

/// Markup for a freshly mounted popup in its loading state.
pub fn popup_shell_html(view: &PopupView) -> String {
    let id = view.id;
    format!(
        "<div id=\"{root}\" data-snip-popup=\"{id}\" style=\"{base} left: {x}px; top: {y}px; \
         opacity: 0.15; transform: scale(0.8); box-shadow: 0 4px 20px rgba(0,0,0,0.3); \
         transition: all 0.3s ease; cursor: move;\">\
         <div id=\"{header}\" data-snip-popup-header=\"{id}\" style=\"{header_style}\">\
         <h3 style=\"margin: 0; color: white; font-size: 16px;\">{title}</h3></div>\
         <div style=\"{content_style}\">\
         <div id=\"{loading}\" style=\"color: #666; margin-bottom: 15px;\">{loading_text}</div>\
         <div id=\"{result}\" style=\"display: none; color: #333; line-height: 1.6; \
         margin-bottom: 15px;\"></div>\
         <button id=\"{close}\" data-snip-popup-close=\"{id}\" style=\"{close_style}\">\
         {close_label}</button></div></div>",
        root = popup_root_id(id),
        id = id,
        base = POPUP_BASE_STYLE,
        x = view.position.x,
        y = view.position.y,
        header = popup_header_id(id),
        header_style = HEADER_STYLE,
        title = html_escape(&view.title),
        content_style = CONTENT_STYLE,
        loading = popup_loading_id(id),
        loading_text = html_escape(&view.loading_text),
        result = popup_result_id(id),
        close = popup_close_id(id),
        close_style = CLOSE_BUTTON_STYLE,
        close_label = html_escape(&view.close_label),
    )
}

/// Renders the answer region of one structured item.
fn answer_html(item: &ResultItem) -> String {
    match &item.answer {
        AnswerPayload::Many(answers) => answers
            .iter()
            .map(|ans| {
                format!(
                    "<div style=\"display: flex; align-items: flex-start; gap: 8px; \
                     margin-bottom: 6px; padding: 8px; background: #f0fdf4; border-radius: 6px; \
                     border: 1px solid #bbf7d0;\">\
                     <span style=\"color: #22c55e; font-size: 16px; flex-shrink: 0; \
                     margin-top: 1px;\">&#10003;</span>\
                     <span style=\"color: #1e293b; font-size: 13px; line-height: 1.4;\">{}</span>\
                     </div>",
                    html_escape(ans)
                )
            })
            .collect(),
        AnswerPayload::Single(answer) => format!(
            "<div style=\"color: #1e293b; font-size: 14px; font-weight: 600; \
             margin-bottom: 8px;\">{}</div>",
            html_escape(answer)
        ),
    }
}

/// Renders one structured question/answer block with its badge.
fn result_item_html(item: &ResultItem, translator: &Translator) -> String {
    let badge = translator.translate(item.answer_type.badge_key());
    let answer_gap = if item.answer_type == AnswerType::MultiSelect {
        "12px"
    } else {
        "8px"
    };
    format!(
        "<div style=\"background: #f0f9ff; border-left: 4px solid #0ea5e9; padding: 12px; \
         border-radius: 6px; margin-bottom: 12px;\">\
         <div style=\"font-size: 11px; color: #0369a1; font-weight: 600; margin-bottom: 6px;\">\
         {question_label}</div>\
         <div style=\"color: #1e293b; font-size: 13px;\">{question}</div></div>\
         <div style=\"background: #f0fdf4; border-left: 4px solid #22c55e; padding: 12px; \
         border-radius: 6px; margin-bottom: 10px;\">\
         <div style=\"display: flex; align-items: center; gap: 8px; margin-bottom: {gap};\">\
         <span style=\"font-size: 20px;\">&#10003;</span>\
         <span style=\"font-size: 11px; color: #15803d; font-weight: 600;\">{answer_label}</span>\
         </div>{answer}\
         <div style=\"display: inline-block; background: #dcfce7; color: #15803d; \
         padding: 4px 10px; border-radius: 12px; font-size: 11px; font-weight: 500; \
         margin-top: 8px;\">{badge}</div></div>",
        question_label = translator.translate("aiQuestionLabel"),
        question = html_escape(&item.question),
        gap = answer_gap,
        answer_label = translator.translate("aiAnswerLabel"),
        answer = answer_html(item),
        badge = html_escape(&badge),
    )
}

/// Banner plus raw block used by both fallback treatments.
fn fallback_html(banner: &str, body: &str) -> String {
    format!(
        "<div style=\"{banner_style}\">\
         <div style=\"font-size: 11px; color: #92400e; font-weight: 600; margin-bottom: 6px;\">\
         {banner}</div></div>\
         <div style=\"{raw_style}\">\
         <div style=\"color: #1e293b; font-size: 13px; white-space: pre-wrap; \
         word-break: break-word; line-height: 1.6;\">{body}</div></div>",
        banner_style = WARNING_BANNER_STYLE,
        banner = banner,
        raw_style = RAW_BLOCK_STYLE,
        body = body,
    )
}

/// Pure function from the analysis view model to the result region markup.
pub fn render_outcome(outcome: &AnalysisOutcome, translator: &Translator) -> String {
    match outcome {
        AnalysisOutcome::Results(items) => items
            .iter()
            .map(|item| result_item_html(item, translator))
            .collect(),
        AnalysisOutcome::TextFallback(raw) => fallback_html(
            &html_escape(&translator.translate("aiTextResponseWarning")),
            &html_escape(raw),
        ),
        AnalysisOutcome::IncompleteJson(value) => {
            let pretty =
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            fallback_html(
                &format!(
                    "&#9888;&#65039; {}",
                    html_escape(&translator.translate("aiIncompleteJsonWarning"))
                ),
                &html_escape(&pretty),
            )
        }
        AnalysisOutcome::Error(message) => format!(
            "<div style=\"background: #fef2f2; border-left: 4px solid #ef4444; padding: 12px; \
             border-radius: 6px;\">\
             <div style=\"font-size: 11px; color: #991b1b; font-weight: 600; \
             margin-bottom: 6px;\">{}</div>\
             <div style=\"color: #7f1d1d; font-size: 12px;\">{}</div></div>",
            html_escape(&translator.translate("aiErrorLabel")),
            html_escape(message),
        ),
    }
}

/// Hover/drag state machine for one mounted popup.
#[derive(Debug, Clone)]
pub struct PopupInteraction {
    position: Point,
    tier: OpacityTier,
    leave_count: u32,
    dragging: bool,
    drag_offset: Point,
}

impl PopupInteraction {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            tier: OpacityTier::Dimmed,
            leave_count: 0,
            dragging: false,
            drag_offset: Point::default(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn tier(&self) -> OpacityTier {
        self.tier
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Applies one interaction event. `Close` is handled by the manager.
    pub fn handle(&mut self, event: PopupEvent) {
        match event {
            PopupEvent::HoverEnter => {
                self.tier = OpacityTier::Focused;
            }
            PopupEvent::HoverLeave => {
                // First leave dims; every later leave fades out entirely.
                self.tier = if self.leave_count == 0 {
                    OpacityTier::Dimmed
                } else {
                    OpacityTier::Faded
                };
                self.leave_count += 1;
            }
            PopupEvent::DragStart { pointer } => {
                self.dragging = true;
                self.drag_offset = Point::new(
                    pointer.x - self.position.x,
                    pointer.y - self.position.y,
                );
            }
            PopupEvent::DragMove {
                pointer,
                popup_size,
                viewport,
            } => {
                if self.dragging {
                    self.position = clamp_to_viewport(
                        Point::new(
                            pointer.x - self.drag_offset.x,
                            pointer.y - self.drag_offset.y,
                        ),
                        popup_size,
                        viewport,
                    );
                }
            }
            PopupEvent::DragEnd => {
                self.dragging = false;
            }
            PopupEvent::Close => {}
        }
    }

    /// Current inline style for the popup root.
    pub fn style(&self) -> String {
        popup_style(self.position, self.tier, self.dragging)
    }
}

/// Clamps a popup position so the panel stays fully inside the viewport.
pub fn clamp_to_viewport(position: Point, popup_size: Size, viewport: Size) -> Point {
    let max_x = (viewport.width - popup_size.width).max(0.0);
    let max_y = (viewport.height - popup_size.height).max(0.0);
    Point::new(
        position.x.clamp(0.0, max_x),
        position.y.clamp(0.0, max_y),
    )
}

/// Trait defining the popup operations the analysis pipeline needs.
pub trait PopupHostTrait: Send + Sync {
    /// Mounts a popup in its loading state. The token is cancelled when the
    /// popup is closed so late results can be discarded.
    fn mount(&self, view: &PopupView, close_token: CancellationToken);
    /// Renders an outcome into a mounted popup. A no-op for a popup that
    /// has already been closed.
    fn render(&self, id: Uuid, outcome: &AnalysisOutcome, translator: &Translator);
    /// Removes a popup and cancels its token.
    fn remove(&self, id: Uuid);
}

struct MountedPopup {
    interaction: PopupInteraction,
    token: CancellationToken,
}

/// Popup host rendering into the host surface via DOM commands.
pub struct PopupManager {
    dom: Arc<dyn DomSink>,
    popups: Mutex<HashMap<Uuid, MountedPopup>>,
}

impl PopupManager {
    pub fn new(dom: Arc<dyn DomSink>) -> Self {
        Self {
            dom,
            popups: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_mounted(&self, id: Uuid) -> bool {
        self.popups.lock().unwrap().contains_key(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.popups.lock().unwrap().len()
    }

    /// Routes an interaction event to a popup's state machine and restyles
    /// it. Close removes the popup and cancels its token.
    pub fn handle_event(&self, id: Uuid, event: PopupEvent) {
        if event == PopupEvent::Close {
            self.remove(id);
            return;
        }
        let mut popups = self.popups.lock().unwrap();
        if let Some(popup) = popups.get_mut(&id) {
            popup.interaction.handle(event);
            let style = popup.interaction.style();
            drop(popups);
            self.dom.apply(&[DomCommand::SetStyle {
                id: popup_root_id(id),
                css: style,
            }]);
        }
    }
}

impl PopupHostTrait for PopupManager {
    fn mount(&self, view: &PopupView, close_token: CancellationToken) {
        self.popups.lock().unwrap().insert(
            view.id,
            MountedPopup {
                interaction: PopupInteraction::new(view.position),
                token: close_token,
            },
        );
        self.dom.apply(&[DomCommand::Append {
            html: popup_shell_html(view),
        }]);
    }

    fn render(&self, id: Uuid, outcome: &AnalysisOutcome, translator: &Translator) {
        if !self.is_mounted(id) {
            return;
        }
        self.dom.apply(&[
            DomCommand::Hide {
                id: popup_loading_id(id),
            },
            DomCommand::SetHtml {
                id: popup_result_id(id),
                html: render_outcome(outcome, translator),
            },
            DomCommand::Show {
                id: popup_result_id(id),
            },
        ]);
    }

    fn remove(&self, id: Uuid) {
        if let Some(popup) = self.popups.lock().unwrap().remove(&id) {
            popup.token.cancel();
            self.dom.apply(&[DomCommand::Remove {
                id: popup_root_id(id),
            }]);
        }
    }
}
