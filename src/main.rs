//! Snipsight: drag-select region capture with clipboard copy and
//! AI-powered analysis.
//!
//! Entry point: launches the transparent overlay window. When built without
//! the `gui` feature, runs a console walkthrough of the core components.

#[cfg(feature = "gui")]
fn main() {
    env_logger::init();
    snipsight::ui::overlay_app::run();
}

#[cfg(not(feature = "gui"))]
fn main() {
    env_logger::init();

    println!();
    println!("Snipsight v{} demo mode (no gui feature)", env!("CARGO_PKG_VERSION"));
    println!();

    demo_selection_tracker();
    demo_response_parser();
    demo_popup_state();
    demo_localization();
    demo_settings_store();

    println!();
    println!("All core components demonstrated.");
}

#[cfg(not(feature = "gui"))]
fn section(name: &str) {
    println!("───────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────");
}

#[cfg(not(feature = "gui"))]
fn demo_selection_tracker() {
    use snipsight::managers::activation_guard::ActivationGuard;
    use snipsight::managers::selection_tracker::SelectionTracker;
    use snipsight::types::geometry::Point;
    use snipsight::types::selection::{PointerEvent, TrackerResponse};

    section("Selection tracker");

    let guard = ActivationGuard::new();
    let mut tracker = SelectionTracker::activate(guard.clone()).unwrap();
    println!("  Activated (double activation no-op: {})",
        SelectionTracker::activate(guard.clone()).is_none());

    tracker.handle_pointer(PointerEvent::Down(Point::new(200.0, 150.0)));
    tracker.handle_pointer(PointerEvent::Move(Point::new(80.0, 320.0)));
    let rect = tracker.selection_rect();
    println!("  Dragged to rect: {}x{} at ({}, {})", rect.width, rect.height, rect.x, rect.y);

    match tracker.handle_pointer(PointerEvent::Up(Point::new(80.0, 320.0))) {
        TrackerResponse::Capture(r) => println!("  Finalized: capture {}x{}", r.width, r.height),
        other => println!("  Finalized: {:?}", other),
    }

    tracker.teardown();
    println!("  Torn down (idempotent second call: {})", !tracker.teardown());
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_response_parser() {
    use snipsight::services::response_parser::{normalize_multi_select, parse_response};
    use snipsight::types::analysis::AnalysisOutcome;

    section("Response parser");

    let fenced = "```json\n{\"question\":\"2+2?\",\"answer_type\":\"text\",\"answer\":\"4\"}\n```";
    match parse_response(fenced) {
        AnalysisOutcome::Results(items) => {
            println!("  Fenced single object: {} item ({})", items.len(), items[0].question)
        }
        other => println!("  Unexpected: {:?}", other),
    }

    let split = normalize_multi_select(&serde_json::json!("a; b, c"));
    println!("  Delimited multi-select: {:?}", split);

    match parse_response("not json at all") {
        AnalysisOutcome::TextFallback(raw) => println!("  Prose body -> text fallback ({} chars)", raw.len()),
        other => println!("  Unexpected: {:?}", other),
    }

    match parse_response("{\"question\":\"Q\",\"answer_type\":\"text\"}") {
        AnalysisOutcome::IncompleteJson(_) => println!("  Missing answer -> incomplete fallback"),
        other => println!("  Unexpected: {:?}", other),
    }
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_popup_state() {
    use snipsight::types::geometry::{Point, Size};
    use snipsight::types::popup::PopupEvent;
    use snipsight::ui::popup::PopupInteraction;

    section("Popup interaction");

    let mut popup = PopupInteraction::new(Point::new(40.0, 40.0));
    println!("  Mounted: {:?}", popup.tier());
    popup.handle(PopupEvent::HoverEnter);
    println!("  Hover enter: {:?}", popup.tier());
    popup.handle(PopupEvent::HoverLeave);
    println!("  First leave: {:?}", popup.tier());
    popup.handle(PopupEvent::HoverEnter);
    popup.handle(PopupEvent::HoverLeave);
    println!("  Second leave: {:?}", popup.tier());

    popup.handle(PopupEvent::DragStart { pointer: Point::new(50.0, 50.0) });
    popup.handle(PopupEvent::DragMove {
        pointer: Point::new(5000.0, 5000.0),
        popup_size: Size::new(400.0, 300.0),
        viewport: Size::new(1280.0, 800.0),
    });
    println!("  Dragged far off-screen, clamped to: {:?}", popup.position());
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_localization() {
    use snipsight::services::localization_engine::{LocalizationEngine, LocalizationEngineTrait};

    section("Localization engine (EN/PL)");

    let mut engine = LocalizationEngine::new();
    println!("  [en] aiAnalysis = {}", engine.t("aiAnalysis"));
    engine.set_language("pl");
    println!("  [pl] aiAnalysis = {}", engine.t("aiAnalysis"));
    engine.set_language("xx");
    println!("  Unknown locale resolves to: {}", engine.language());

    let mut injected = std::collections::HashMap::new();
    injected.insert("aiAnalysis".to_string(), "Injected title".to_string());
    engine.stash_injected(injected);
    let translator = engine.create_translator();
    println!("  Injected dictionary consumed: {} (stash now empty: {})",
        translator.translate("aiAnalysis"), !engine.has_injected());
    println!();
}

#[cfg(not(feature = "gui"))]
fn demo_settings_store() {
    use std::sync::Arc;
    use snipsight::gateway::adapter::{GatewayAdapter, PromiseCapabilities};
    use snipsight::gateway::{RuntimeMessage, RuntimeResponse};
    use snipsight::services::settings_store::SettingsStore;
    use snipsight::types::errors::GatewayError;

    section("Settings store (in-memory gateway)");

    struct MemoryBackend {
        store: std::sync::Mutex<serde_json::Map<String, serde_json::Value>>,
    }

    #[async_trait::async_trait]
    impl PromiseCapabilities for MemoryBackend {
        async fn storage_get(
            &self,
            keys: Vec<String>,
        ) -> Result<serde_json::Map<String, serde_json::Value>, GatewayError> {
            let store = self.store.lock().unwrap();
            Ok(keys
                .into_iter()
                .filter_map(|k| store.get(&k).map(|v| (k, v.clone())))
                .collect())
        }
        async fn storage_set(
            &self,
            items: serde_json::Map<String, serde_json::Value>,
        ) -> Result<(), GatewayError> {
            self.store.lock().unwrap().extend(items);
            Ok(())
        }
        async fn storage_remove(&self, keys: Vec<String>) -> Result<(), GatewayError> {
            let mut store = self.store.lock().unwrap();
            for key in keys {
                store.remove(&key);
            }
            Ok(())
        }
        async fn send_runtime_message(
            &self,
            _message: RuntimeMessage,
        ) -> Result<RuntimeResponse, GatewayError> {
            Ok(RuntimeResponse::default())
        }
        async fn capture_visible_viewport(&self) -> Result<String, GatewayError> {
            Err(GatewayError::Capture("not available in demo".to_string()))
        }
    }

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let backend = Arc::new(MemoryBackend {
        store: std::sync::Mutex::new(serde_json::Map::new()),
    });
    let gateway = Arc::new(GatewayAdapter::from_promise(backend));
    let store = SettingsStore::new(gateway);

    runtime.block_on(async {
        let defaults = store.load().await;
        println!("  Defaults: model={}, ai_enabled={}, language={}",
            defaults.selected_model, defaults.ai_enabled, defaults.language);

        store.save_api_key("sk-demo-123").await.unwrap();
        store.save_language("pl").await.unwrap();
        let loaded = store.load().await;
        println!("  After save: api_key={}, language={}",
            loaded.has_api_key(), loaded.language);

        store.remove_api_key().await.unwrap();
        println!("  After remove: api_key={}", store.load().await.has_api_key());
    });
}
