use super::Listeners;
use crate::input::PointerState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn viewport_size(window: &web::Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}

/// Pointer, press and touch handlers only write the shared position; the next tick
/// reads it.
pub fn wire_pointer_handlers(
    window: &web::Window,
    pointer: &Rc<RefCell<PointerState>>,
    listeners: &mut Listeners,
) {
    let win = window.clone();
    let state = pointer.clone();
    listeners.add(window, "pointermove", move |ev: web::Event| {
        if let Some(pe) = ev.dyn_ref::<web::PointerEvent>() {
            let (w, h) = viewport_size(&win);
            state
                .borrow_mut()
                .update(pe.client_x() as f64, pe.client_y() as f64, w, h);
        }
    });

    let win = window.clone();
    let state = pointer.clone();
    listeners.add(window, "touchmove", move |ev: web::Event| {
        let Some(te) = ev.dyn_ref::<web::TouchEvent>() else {
            return;
        };
        if let Some(touch) = te.touches().get(0) {
            let (w, h) = viewport_size(&win);
            state
                .borrow_mut()
                .update(touch.client_x() as f64, touch.client_y() as f64, w, h);
        }
    });

    // pointerdown also covers touch and pen presses
    let win = window.clone();
    let state = pointer.clone();
    listeners.add(window, "pointerdown", move |ev: web::Event| {
        if let Some(pe) = ev.dyn_ref::<web::PointerEvent>() {
            let (w, h) = viewport_size(&win);
            state
                .borrow_mut()
                .press(pe.client_x() as f64, pe.client_y() as f64, w, h);
        }
    });

    let state = pointer.clone();
    listeners.add(window, "touchend", move |_ev: web::Event| {
        state.borrow_mut().clear();
    });
}
