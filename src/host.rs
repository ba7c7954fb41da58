use crate::app::App;
use crate::core::{Backdrop, FieldConfig, ParticleBackdrop, QualityTier};
use crate::dom::{self, ContainerOverrides};
use crate::events::{self, Listeners, ThemeWatch};
use crate::frame::{self, FrameLoop};
use crate::input::PointerState;
use crate::render::{Canvas2dRenderer, GpuRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Everything the running backdrop keeps alive in the page.
struct Host {
    app: Rc<RefCell<App>>,
    frame_loop: FrameLoop,
    listeners: Listeners,
    theme_watch: Option<ThemeWatch>,
}

impl Host {
    fn shutdown(mut self) {
        self.app.borrow_mut().stop();
        self.frame_loop.cancel();
        let detached = self.listeners.count();
        self.listeners.detach_all();
        if let Some(watch) = self.theme_watch.take() {
            watch.disconnect();
        }
        log::info!("[host] torn down ({} listeners detached)", detached);
    }
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

fn host_running() -> bool {
    HOST.with(|h| h.borrow().is_some())
}

/// Tear the backdrop down. Safe to call any number of times.
fn teardown() {
    // take first so no borrow is held while listeners and closures drop
    let host = HOST.with(|h| h.borrow_mut().take());
    if let Some(host) = host {
        host.shutdown();
    }
}

/// Stop the backdrop and release everything it holds.
#[wasm_bindgen]
pub fn stop() {
    teardown();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[host] portfolio-particles loaded");

    if let Some(window) = web::window() {
        events::wire_page_restore(&window, restore);
    }

    let document = dom::window_document().ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(launch);
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        launch();
    }
    Ok(())
}

/// Back/forward cache restore: resume a paused backdrop, or relaunch one
/// that an unload already tore down.
fn restore() {
    let app = HOST.with(|h| h.borrow().as_ref().map(|host| host.app.clone()));
    match app {
        Some(app) => {
            log::info!("[host] restored from cache; resuming");
            app.borrow_mut().set_visible(true);
        }
        None => {
            log::info!("[host] restored from cache; relaunching");
            launch();
        }
    }
}

fn launch() {
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("[host] init error: {:#}", e);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    if host_running() {
        return Ok(());
    }
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let env = dom::launch_env(&window, &document);
    let Some(tier) = App::admit(&env) else {
        return Ok(());
    };
    let container = match dom::find_container(&document) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("[host] {}; backdrop not started", e);
            return Ok(());
        }
    };
    let overrides = dom::container_overrides(&container);
    let (backdrop, canvas) = build_backdrop(&document, &container, &env, tier, &overrides).await?;

    let app = Rc::new(RefCell::new(App::new(backdrop, env.theme)));
    let (w, h) = dom::css_size(&canvas);
    app.borrow_mut().resize(w, h);

    let pointer = Rc::new(RefCell::new(PointerState::default()));
    let mut listeners = Listeners::new();
    events::wire_pointer_handlers(&window, &pointer, &mut listeners);
    events::wire_page_handlers(&window, &document, &app, &canvas, &mut listeners, teardown);
    let theme_watch = ThemeWatch::install(&document, &app);
    let frame_loop = frame::start_loop(app.clone(), pointer, teardown);

    log::info!(
        "[host] running: {} particles, tier={}",
        app.borrow().particle_count(),
        app.borrow().tier().as_str()
    );
    HOST.with(|h| {
        *h.borrow_mut() = Some(Host {
            app,
            frame_loop,
            listeners,
            theme_watch,
        })
    });
    Ok(())
}

/// WebGPU when the browser exposes it, otherwise (or when device setup
/// fails) the 2D canvas fallback at the low tier.
async fn build_backdrop(
    document: &web::Document,
    container: &web::Element,
    env: &crate::app::LaunchEnv,
    tier: QualityTier,
    overrides: &ContainerOverrides,
) -> anyhow::Result<(Box<dyn Backdrop>, web::HtmlCanvasElement)> {
    let seed = overrides.seed.unwrap_or_else(rand::random);
    let canvas = dom::create_canvas(document, container)?;

    if env.probe.gpu_available {
        match GpuRenderer::new(canvas.clone()).await {
            Ok(gpu) => {
                let mut config = FieldConfig::spatial(seed);
                if let Some(boundary) = overrides.boundary {
                    config = config.with_boundary(boundary);
                }
                let backdrop = ParticleBackdrop::new(config, tier, env.theme, gpu)?;
                return Ok((Box::new(backdrop), canvas));
            }
            Err(e) => {
                log::info!("[host] WebGPU setup failed ({:#}); using 2D canvas", e);
                // a canvas that was handed to WebGPU cannot give out a 2D context
                canvas.remove();
            }
        }
    }

    let canvas = if canvas.is_connected() {
        canvas
    } else {
        dom::create_canvas(document, container)?
    };
    let renderer = Canvas2dRenderer::new(canvas.clone())?;
    let (w, h) = renderer.css_size();
    let mut config = FieldConfig::flat(w, h, seed);
    if let Some(boundary) = overrides.boundary {
        config = config.with_boundary(boundary);
    }
    let backdrop = ParticleBackdrop::new(config, QualityTier::Low, env.theme, renderer)?;
    Ok((Box::new(backdrop), canvas))
}
