//! Selection session: wires the tracker, overlay, and pipelines together
//! for one drag-to-select interaction.
//!
//! Control flow: tracker → (valid rectangle) → capture pipeline →
//! (clipboard success) → analysis pipeline → popup. The overlay lives for
//! the session and is torn down on completion or cancellation; the popup
//! and any in-flight analysis outlive the session.

use std::sync::Arc;

use log::{error, info};

use crate::managers::activation_guard::ActivationGuard;
use crate::managers::selection_tracker::SelectionTracker;
use crate::services::analysis_pipeline::AnalysisPipeline;
use crate::services::capture_pipeline::CapturePipeline;
use crate::services::localization_engine::Translator;
use crate::types::errors::CaptureError;
use crate::types::geometry::Rect;
use crate::types::selection::{PointerEvent, TrackerResponse};
use crate::ui::dom::DomSink;
use crate::ui::overlay::OverlayRenderer;
use crate::ui::toast::{ToastKind, ToastSinkTrait};

pub struct SelectionSession {
    tracker: SelectionTracker,
    overlay: OverlayRenderer,
    dom: Arc<dyn DomSink>,
    capture: CapturePipeline,
    analysis: Arc<AnalysisPipeline>,
    toasts: Arc<dyn ToastSinkTrait>,
    translator: Arc<Translator>,
    device_pixel_ratio: f64,
}

impl SelectionSession {
    /// Bootstraps a session: claims the activation guard and mounts the
    /// overlay. Returns `None` (no-op) when a session is already active.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        guard: ActivationGuard,
        dom: Arc<dyn DomSink>,
        capture: CapturePipeline,
        analysis: Arc<AnalysisPipeline>,
        toasts: Arc<dyn ToastSinkTrait>,
        translator: Arc<Translator>,
        device_pixel_ratio: f64,
    ) -> Option<Self> {
        let tracker = SelectionTracker::activate(guard)?;
        let mut overlay = OverlayRenderer::new();
        dom.apply(&overlay.mount());
        info!("selection session started");
        Some(Self {
            tracker,
            overlay,
            dom,
            capture,
            analysis,
            toasts,
            translator,
            device_pixel_ratio,
        })
    }

    pub fn is_torn_down(&self) -> bool {
        self.tracker.is_torn_down()
    }

    /// Feeds one pointer event through the tracker and executes whatever it
    /// asks for. Events after teardown are no-ops.
    pub async fn handle_pointer(&mut self, event: PointerEvent) {
        match self.tracker.handle_pointer(event) {
            TrackerResponse::None => {}
            TrackerResponse::Indicator(rect) => {
                self.dom.apply(&self.overlay.indicator_update(rect));
            }
            TrackerResponse::Dismiss => self.teardown(),
            TrackerResponse::Capture(rect) => self.run_capture(rect).await,
        }
    }

    /// Runs the capture pipeline for a finalized rectangle, then tears the
    /// session down regardless of the result.
    async fn run_capture(&mut self, rect: Rect) {
        // Hide the overlay chrome so it is absent from the screenshot.
        self.dom.apply(&self.overlay.hide_all());

        match self.capture.run(rect, self.device_pixel_ratio).await {
            Ok(outcome) => {
                // The popup outlives this session: analysis runs detached so
                // a new selection can start while results are still loading.
                let analysis = self.analysis.clone();
                let translator = self.translator.clone();
                tokio::spawn(async move {
                    analysis
                        .run(outcome.png, outcome.rect.top_left(), &translator)
                        .await;
                });
            }
            Err(err) => {
                error!("capture failed: {}", err);
                let key = match err {
                    CaptureError::ClipboardWrite(_) => "errorCopyingToClipboard",
                    _ => "errorCapturingImage",
                };
                self.toasts
                    .show(&self.translator.translate(key), ToastKind::Error);
            }
        }

        self.teardown();
    }

    /// Removes listeners and overlay nodes exactly once and clears the
    /// activation guard. Safe to call from every exit path.
    pub fn teardown(&mut self) {
        if self.tracker.teardown() {
            self.dom.apply(&self.overlay.dispose());
            info!("selection session torn down");
        }
    }
}
