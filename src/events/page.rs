use super::Listeners;
use crate::app::App;
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Observer on `<body class>` that forwards theme flips to the app.
pub struct ThemeWatch {
    observer: web::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web::MutationObserver)>,
}

impl ThemeWatch {
    pub fn install(document: &web::Document, app: &Rc<RefCell<App>>) -> Option<Self> {
        let body = document.body()?;
        let doc = document.clone();
        let app = app.clone();
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _obs: web::MutationObserver| {
            let theme = dom::body_theme(&doc);
            app.borrow_mut().set_theme(theme);
        })
            as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);
        let observer = match web::MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(o) => o,
            Err(e) => {
                log::warn!("[host] MutationObserver unavailable: {:?}", e);
                return None;
            }
        };
        let init = web::MutationObserverInit::new();
        init.set_attributes(true);
        let filter = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str("class"));
        init.set_attribute_filter(&filter);
        if let Err(e) = observer.observe_with_options(&body, &init) {
            log::warn!("[host] theme observer failed: {:?}", e);
            return None;
        }
        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Visibility, resize and unload wiring. `on_unload` runs the host teardown;
/// a page entering the back/forward cache is only paused.
pub fn wire_page_handlers(
    window: &web::Window,
    document: &web::Document,
    app: &Rc<RefCell<App>>,
    canvas: &web::HtmlCanvasElement,
    listeners: &mut Listeners,
    on_unload: fn(),
) {
    let doc = document.clone();
    let app_vis = app.clone();
    listeners.add(document, "visibilitychange", move |_ev: web::Event| {
        let visible = !doc.hidden();
        log::info!("[host] visible={}", visible);
        app_vis.borrow_mut().set_visible(visible);
    });

    let app_resize = app.clone();
    let canvas_resize = canvas.clone();
    listeners.add(window, "resize", move |_ev: web::Event| {
        let (w, h) = dom::css_size(&canvas_resize);
        app_resize.borrow_mut().resize(w, h);
    });

    // a persisted hide goes into the back/forward cache and may come back
    let app_hide = app.clone();
    listeners.add(window, "pagehide", move |ev: web::Event| {
        let persisted = ev
            .dyn_ref::<web::PageTransitionEvent>()
            .is_some_and(|e| e.persisted());
        if persisted {
            log::info!("[host] page cached; pausing");
            app_hide.borrow_mut().set_visible(false);
        } else {
            on_unload();
        }
    });
    listeners.add(window, "beforeunload", move |_ev: web::Event| on_unload());
}

/// Page-lifetime `pageshow` listener. Runs `on_restore` when the page comes
/// back from the back/forward cache. Outlives any single backdrop, so it is
/// never detached.
pub fn wire_page_restore(window: &web::Window, on_restore: fn()) {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let persisted = ev
            .dyn_ref::<web::PageTransitionEvent>()
            .is_some_and(|e| e.persisted());
        if persisted {
            on_restore();
        }
    }) as Box<dyn FnMut(web::Event)>);
    if let Err(e) =
        window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())
    {
        log::warn!("[host] could not attach pageshow listener: {:?}", e);
        return;
    }
    closure.forget();
}
