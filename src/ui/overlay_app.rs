//! Fullscreen overlay application using `wry` + `tao`.
//!
//! Architecture:
//! - A borderless transparent always-on-top window covers the viewport; the
//!   page inside it hosts the overlay, indicator, popups, and toasts.
//! - The page is served via the `snip://` custom protocol and contains only
//!   a bootstrap script that forwards pointer/keyboard events to Rust.
//! - IPC from JS → Rust via `window.ipc.postMessage()`; effects flow back
//!   as DOM-command scripts through the event loop proxy.

use std::sync::{Arc, Mutex};

use log::{error, warn};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy};
use tao::window::{Fullscreen, WindowBuilder};
use uuid::Uuid;
use wry::WebViewBuilder;

use crate::app::App;
use crate::gateway::adapter::GatewayAdapter;
use crate::gateway::desktop::DesktopGateway;
use crate::gateway::CapabilityGateway;
use crate::managers::selection_session::SelectionSession;
use crate::platform::clipboard::ArboardClipboard;
use crate::services::analysis_pipeline::AnalysisPipeline;
use crate::services::capture_pipeline::CapturePipeline;
use crate::services::inference_api::{InferenceApiTrait, PollinationsClient};
use crate::services::localization_engine::LocalizationEngineTrait;
use crate::types::geometry::{Point, Size};
use crate::types::popup::PopupEvent;
use crate::types::selection::PointerEvent;
use crate::ui::dom::{commands_to_script, DomCommand, DomSink};
use crate::ui::popup::{PopupHostTrait, PopupManager};
use crate::ui::toast::{DomToastSink, ToastSinkTrait};

#[derive(Debug)]
enum UserEvent {
    Eval(String),
    Exit,
}

/// DOM sink forwarding command batches to the webview via the event loop.
struct ProxyDomSink {
    proxy: Mutex<EventLoopProxy<UserEvent>>,
}

impl DomSink for ProxyDomSink {
    fn apply(&self, commands: &[DomCommand]) {
        if commands.is_empty() {
            return;
        }
        let script = commands_to_script(commands);
        let _ = self
            .proxy
            .lock()
            .unwrap()
            .send_event(UserEvent::Eval(script));
    }
}

/// Events arriving from the page, already parsed.
enum HostEvent {
    Activate,
    Pointer(PointerEvent),
    Popup { id: Uuid, event: PopupEvent },
}

fn parse_ipc(message: &str) -> Option<HostEvent> {
    let msg: serde_json::Value = serde_json::from_str(message).ok()?;
    let cmd = msg.get("cmd")?.as_str()?;

    match cmd {
        "ready" | "activate" => Some(HostEvent::Activate),
        "escape" => Some(HostEvent::Pointer(PointerEvent::Escape)),
        "pointer" => {
            let kind = msg.get("kind")?.as_str()?;
            let point = Point::new(msg.get("x")?.as_f64()?, msg.get("y")?.as_f64()?);
            let event = match kind {
                "down" => PointerEvent::Down(point),
                "move" => PointerEvent::Move(point),
                "up" => PointerEvent::Up(point),
                _ => return None,
            };
            Some(HostEvent::Pointer(event))
        }
        "popup" => {
            let id = Uuid::parse_str(msg.get("id")?.as_str()?).ok()?;
            let kind = msg.get("kind")?.as_str()?;
            let event = match kind {
                "hover_enter" => PopupEvent::HoverEnter,
                "hover_leave" => PopupEvent::HoverLeave,
                "drag_start" => PopupEvent::DragStart {
                    pointer: Point::new(msg.get("x")?.as_f64()?, msg.get("y")?.as_f64()?),
                },
                "drag_move" => PopupEvent::DragMove {
                    pointer: Point::new(msg.get("x")?.as_f64()?, msg.get("y")?.as_f64()?),
                    popup_size: Size::new(msg.get("w")?.as_f64()?, msg.get("h")?.as_f64()?),
                    viewport: Size::new(msg.get("vw")?.as_f64()?, msg.get("vh")?.as_f64()?),
                },
                "drag_end" => PopupEvent::DragEnd,
                "close" => PopupEvent::Close,
                _ => return None,
            };
            Some(HostEvent::Popup { id, event })
        }
        _ => None,
    }
}

const BOOTSTRAP_JS: &str = r#"
(function(){
  function post(m){ if(window.ipc) window.ipc.postMessage(JSON.stringify(m)); }

  document.addEventListener('mousedown', function(e){
    var header = e.target.closest('[data-snip-popup-header]');
    if (header) {
      window.__snipDragging = header.dataset.snipPopupHeader;
      post({cmd:'popup', kind:'drag_start', id: window.__snipDragging, x: e.clientX, y: e.clientY});
      e.preventDefault();
      return;
    }
    if (e.target.id === 'snipsight-overlay')
      post({cmd:'pointer', kind:'down', x: e.clientX, y: e.clientY});
  });

  document.addEventListener('mousemove', function(e){
    if (window.__snipDragging) {
      var p = document.getElementById('snip-popup-' + window.__snipDragging);
      if (p) {
        post({cmd:'popup', kind:'drag_move', id: window.__snipDragging,
              x: e.clientX, y: e.clientY, w: p.offsetWidth, h: p.offsetHeight,
              vw: window.innerWidth, vh: window.innerHeight});
        e.preventDefault();
      }
      return;
    }
    if (e.target.id === 'snipsight-overlay')
      post({cmd:'pointer', kind:'move', x: e.clientX, y: e.clientY});
  });

  document.addEventListener('mouseup', function(e){
    if (window.__snipDragging) {
      post({cmd:'popup', kind:'drag_end', id: window.__snipDragging});
      window.__snipDragging = null;
      return;
    }
    if (e.target.id === 'snipsight-overlay')
      post({cmd:'pointer', kind:'up', x: e.clientX, y: e.clientY});
  });

  document.addEventListener('mouseover', function(e){
    if (!e.target.closest) return;
    var p = e.target.closest('[data-snip-popup]');
    var from = e.relatedTarget && e.relatedTarget.closest ? e.relatedTarget.closest('[data-snip-popup]') : null;
    if (p && p !== from) post({cmd:'popup', kind:'hover_enter', id: p.dataset.snipPopup});
  });

  document.addEventListener('mouseout', function(e){
    if (!e.target.closest) return;
    var p = e.target.closest('[data-snip-popup]');
    var to = e.relatedTarget && e.relatedTarget.closest ? e.relatedTarget.closest('[data-snip-popup]') : null;
    if (p && p !== to) post({cmd:'popup', kind:'hover_leave', id: p.dataset.snipPopup});
  });

  document.addEventListener('click', function(e){
    if (!e.target.closest) return;
    var c = e.target.closest('[data-snip-popup-close]');
    if (c) post({cmd:'popup', kind:'close', id: c.dataset.snipPopupClose});
  });

  document.addEventListener('keydown', function(e){
    if (e.key === 'Escape') post({cmd:'escape'});
    if (e.key === 'n' || e.key === 'N') post({cmd:'activate'});
  });

  post({cmd:'ready'});
})();
"#;

/// The page behind the overlay window: a transparent surface plus the
/// bootstrap script. Everything visible is mounted later via DOM commands.
fn overlay_page() -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>\
         html,body{{margin:0;padding:0;width:100%;height:100%;\
         background:transparent;overflow:hidden}}\
         </style></head><body><script>{}</script></body></html>",
        BOOTSTRAP_JS
    )
}

// ─── Main entry point ───

pub fn run() {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");

    let event_loop: EventLoop<UserEvent> = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title("Snipsight")
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top(true)
        .with_fullscreen(Some(Fullscreen::Borderless(None)))
        .build(&event_loop)
        .expect("Failed to create window");

    let device_pixel_ratio = window.scale_factor();

    // Core wiring: desktop backend behind the dialect adapter.
    let gateway: Arc<dyn CapabilityGateway> =
        Arc::new(GatewayAdapter::from_promise(Arc::new(DesktopGateway::new())));
    let api: Arc<dyn InferenceApiTrait> = Arc::new(PollinationsClient::new());
    let mut app = App::new(gateway, api);
    runtime.block_on(app.startup());

    // Deliver the dictionary through the injected-translations contract and
    // consume it while building the session translator.
    let language = app.localization_engine.language().to_string();
    let table = app.localization_engine.translations_for(&language).clone();
    app.localization_engine.stash_injected(table);
    let translator = Arc::new(app.localization_engine.create_translator());

    let dom: Arc<dyn DomSink> = Arc::new(ProxyDomSink {
        proxy: Mutex::new(proxy.clone()),
    });
    let toasts: Arc<dyn ToastSinkTrait> = Arc::new(DomToastSink::new(dom.clone()));
    let popups = Arc::new(PopupManager::new(dom.clone()));
    let analysis = Arc::new(AnalysisPipeline::new(
        app.settings_store.clone(),
        app.inference_api.clone(),
        popups.clone() as Arc<dyn PopupHostTrait>,
        toasts.clone(),
    ));
    let guard = app.activation_guard.clone();
    let gateway = app.gateway.clone();

    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<HostEvent>();

    // Driver task: owns the selection session and routes events.
    {
        let exit_proxy = proxy.clone();
        let dom = dom.clone();
        let popups = popups.clone();
        runtime.spawn(async move {
            let mut session: Option<SelectionSession> = None;
            while let Some(event) = event_rx.recv().await {
                match event {
                    HostEvent::Activate => {
                        if session.as_ref().is_some_and(|s| !s.is_torn_down()) {
                            continue;
                        }
                        let clipboard = match ArboardClipboard::new() {
                            Ok(clipboard) => clipboard,
                            Err(e) => {
                                error!("clipboard unavailable: {}", e);
                                continue;
                            }
                        };
                        session = SelectionSession::begin(
                            guard.clone(),
                            dom.clone(),
                            CapturePipeline::new(gateway.clone(), Box::new(clipboard)),
                            analysis.clone(),
                            toasts.clone(),
                            translator.clone(),
                            device_pixel_ratio,
                        );
                    }
                    HostEvent::Pointer(pointer_event) => {
                        let escape = matches!(pointer_event, PointerEvent::Escape);
                        let mut torn_down = true;
                        if let Some(active) = session.as_mut() {
                            active.handle_pointer(pointer_event).await;
                            torn_down = active.is_torn_down();
                        }
                        if torn_down {
                            session = None;
                            // Escape with nothing left on screen quits the app.
                            if escape && popups.mounted_count() == 0 {
                                let _ = exit_proxy.send_event(UserEvent::Exit);
                            }
                        }
                    }
                    HostEvent::Popup { id, event } => popups.handle_event(id, event),
                }
            }
        });
    }

    let ipc_tx = event_tx;
    let builder = WebViewBuilder::new()
        .with_custom_protocol("snip".into(), move |_wv_id, _request| {
            wry::http::Response::builder()
                .header("Content-Type", "text/html; charset=utf-8")
                .body(overlay_page().into_bytes().into())
                .unwrap()
        })
        .with_url("snip://localhost/overlay")
        .with_transparent(true)
        .with_ipc_handler(move |msg: wry::http::Request<String>| {
            let body = msg.body().as_str();
            match parse_ipc(body) {
                Some(event) => {
                    let _ = ipc_tx.send(event);
                }
                None => warn!("unrecognized IPC message: {}", &body[..body.len().min(200)]),
            }
        })
        .with_devtools(cfg!(debug_assertions));

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().expect("Failed to get GTK vbox");
        builder.build_gtk(vbox).expect("Failed to create WebView")
    };

    #[cfg(not(target_os = "linux"))]
    let webview = builder.build(&window).expect("Failed to create WebView");

    event_loop.run(move |event, _, control_flow| {
        // The runtime must live as long as the loop; capture it here.
        let _ = &runtime;
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(UserEvent::Eval(script)) => {
                let _ = webview.evaluate_script(&script);
            }
            Event::UserEvent(UserEvent::Exit) => {
                *control_flow = ControlFlow::Exit;
            }
            _ => {}
        }
    });
}
