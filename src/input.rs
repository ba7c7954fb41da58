use glam::Vec2;

/// Latest pointer position, written by input callbacks and read by the tick.
#[derive(Default, Clone, Copy, Debug)]
pub struct PointerState {
    pub ndc: Option<Vec2>,
    /// Press position not yet turned into a burst by the tick.
    pub pending_burst: Option<Vec2>,
}

impl PointerState {
    pub fn update(&mut self, client_x: f64, client_y: f64, viewport_w: f64, viewport_h: f64) {
        if let Some(ndc) = viewport_to_ndc(client_x, client_y, viewport_w, viewport_h) {
            self.ndc = Some(ndc);
        }
    }

    /// A press also moves the pointer. Only the latest unconsumed press is kept.
    pub fn press(&mut self, client_x: f64, client_y: f64, viewport_w: f64, viewport_h: f64) {
        if let Some(ndc) = viewport_to_ndc(client_x, client_y, viewport_w, viewport_h) {
            self.ndc = Some(ndc);
            self.pending_burst = Some(ndc);
        }
    }

    pub fn take_burst(&mut self) -> Option<Vec2> {
        self.pending_burst.take()
    }

    pub fn clear(&mut self) {
        self.ndc = None;
    }
}

/// Viewport pixels (y down) to normalized device coordinates (y up).
#[inline]
pub fn viewport_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Option<Vec2> {
    if !(width > 0.0 && height > 0.0) || !x.is_finite() || !y.is_finite() {
        return None;
    }
    let u = (x / width).clamp(0.0, 1.0) as f32;
    let v = (y / height).clamp(0.0, 1.0) as f32;
    Some(Vec2::new(u * 2.0 - 1.0, 1.0 - v * 2.0))
}
