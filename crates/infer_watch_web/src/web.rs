use std::cell::RefCell;
use std::rc::Rc;

use infer_watch::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::schedule::{page_config, PollerKind, CONFIG_ELEMENT_ID};

mod dom;
mod fetch;

use dom::DomSurface;
use fetch::FetchTransport;

pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = when_dom_ready(run) {
        console_error(&format!("infer_watch: {e}"));
    }
}

fn run() {
    match App::mount() {
        Ok(app) => {
            if let Err(e) = app.schedule() {
                console_error(&format!("infer_watch: {e}"));
            }
        }
        Err(e) => console_error(&format!("infer_watch: {e}")),
    }
}

struct App {
    cfg: WatchConfig,
    transport: FetchTransport,
    surface: DomSurface,
    live: RefCell<LiveFeedPoller>,
    history: RefCell<HistoryPoller>,
}

impl App {
    fn mount() -> Result<Rc<Self>, String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let raw = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        let cfg = page_config(raw.as_deref())?;

        let mut surface = DomSurface::attach(&document, &cfg.elements)?;
        surface.install_image_handlers();
        boot(&mut surface);

        Ok(Rc::new(Self {
            cfg,
            transport: FetchTransport,
            surface,
            live: RefCell::new(LiveFeedPoller::new()),
            history: RefCell::new(HistoryPoller::new()),
        }))
    }

    /// Run both pollers once now, then each on its own interval.
    fn schedule(self: &Rc<Self>) -> Result<(), String> {
        for &kind in PollerKind::all() {
            self.tick(kind);
            let app = Rc::clone(self);
            every(kind.interval_ms(&self.cfg), move || app.tick(kind))
                .map_err(|e| format!("{} timer: {e}", kind.label()))?;
        }
        Ok(())
    }

    fn tick(self: &Rc<Self>, kind: PollerKind) {
        match kind {
            PollerKind::LiveFeed => self.tick_live(),
            PollerKind::History => self.tick_history(),
        }
    }

    // The ticket is taken before the request goes out; the poller is only
    // borrowed again once the response is back, never across the await.
    fn tick_live(self: &Rc<Self>) {
        let ticket = self.live.borrow_mut().begin();
        let app = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let url = PollerKind::LiveFeed.url(&app.cfg);
            let result = app.transport.get_json::<LatestDataPayload>(&url).await;
            if let Err(e) = &result {
                console_error(&format!("Error fetching latest data: {e}"));
            }
            let mut surface = app.surface.clone();
            let outcome = app.live.borrow_mut().apply(ticket, result, &mut surface);
            if let LiveFeedOutcome::Rendered { .. } = outcome {
                console_log("New live data received. Updating.");
            }
        });
    }

    fn tick_history(self: &Rc<Self>) {
        let ticket = self.history.borrow_mut().begin();
        let app = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let url = PollerKind::History.url(&app.cfg);
            let result = app.transport.get_json::<Vec<HistoryItem>>(&url).await;
            if let Err(e) = &result {
                console_error(&format!("Error fetching history data: {e}"));
            }
            let mut surface = app.surface.clone();
            let outcome = app.history.borrow_mut().apply(ticket, result, &mut surface);
            if let HistoryOutcome::Rebuilt { .. } = outcome {
                console_log("New history data received. Updating history display.");
            }
        });
    }
}

fn every(ms: u32, mut f: impl FnMut() + 'static) -> Result<i32, String> {
    let window = web_sys::window().ok_or("no window")?;
    let cb = Closure::wrap(Box::new(move || f()) as Box<dyn FnMut()>);
    let timeout = i32::try_from(ms).map_err(|_| format!("interval too large: {ms} ms"))?;
    let id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), timeout)
        .map_err(|_| "failed to start interval".to_string())?;
    // Intervals live as long as the page.
    cb.forget();
    Ok(id)
}

fn when_dom_ready(f: fn()) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }

    let cb = Closure::once_into_js(f);
    document
        .add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())
        .map_err(|_| "add_event_listener() threw".to_string())?;
    Ok(())
}

pub(crate) fn console_log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub(crate) fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}
