use crate::app::App;
use crate::input::PointerState;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// requestAnimationFrame loop driving `App::frame`.
///
/// The loop re-arms itself only while the app wants frames, so once the app
/// stops no further callback is requested.
pub struct FrameLoop {
    tick: TickClosure,
    pending: Rc<Cell<Option<i32>>>,
}

fn request(tick: &TickClosure, pending: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => pending.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}

/// `on_stop` runs once the app stops wanting frames, from inside the last
/// callback.
pub fn start_loop(
    app: Rc<RefCell<App>>,
    pointer: Rc<RefCell<PointerState>>,
    on_stop: fn(),
) -> FrameLoop {
    let tick: TickClosure = Rc::new(RefCell::new(None));
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let origin = Instant::now();

    let tick_clone = tick.clone();
    let pending_clone = pending.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending_clone.set(None);
        let now_ms = origin.elapsed().as_secs_f64() * 1000.0;
        let (ndc, burst) = {
            let mut state = pointer.borrow_mut();
            (state.ndc, state.take_burst())
        };
        let keep_going = {
            let mut app = app.borrow_mut();
            if let Some(at) = burst {
                app.burst(at);
            }
            app.frame(now_ms, ndc)
        };
        if keep_going {
            request(&tick_clone, &pending_clone);
        } else {
            log::info!("[frame] app stopped; tearing down host");
            on_stop();
        }
    }) as Box<dyn FnMut()>));

    request(&tick, &pending);
    FrameLoop { tick, pending }
}

impl FrameLoop {
    /// Cancel the pending callback and drop the closure. Idempotent.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // breaks the closure's self-reference
        self.tick.borrow_mut().take();
    }
}
