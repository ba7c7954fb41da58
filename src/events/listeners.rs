use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Registration {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

/// Event listeners that stay attached until `detach_all` (or drop).
///
/// Closures are kept alive here rather than leaked with `forget`, so
/// teardown can remove every one of them.
#[derive(Default)]
pub struct Listeners {
    registrations: Vec<Registration>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        if let Err(e) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::warn!("[host] could not attach {} listener: {:?}", event, e);
            return;
        }
        self.registrations.push(Registration {
            target: target.clone(),
            event,
            closure,
        });
    }

    pub fn count(&self) -> usize {
        self.registrations.len()
    }

    pub fn detach_all(&mut self) {
        for r in self.registrations.drain(..) {
            _ = r
                .target
                .remove_event_listener_with_callback(r.event, r.closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.detach_all();
    }
}
