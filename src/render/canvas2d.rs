use crate::constants::{BURST_SPARK_SIZE, LINK_BASE_ALPHA};
use crate::core::{Renderer, Scene};
use crate::dom;
use crate::error::BackdropError;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// 2D canvas fallback. Pool coordinates are CSS pixels; the context
/// transform scales them to the backing store.
pub struct Canvas2dRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    pixel_ratio_cap: f32,
    ratio: f64,
    released: bool,
}

fn css_rgba(rgb: [f32; 3], alpha: f32) -> String {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{:.3})",
        to_byte(rgb[0]),
        to_byte(rgb[1]),
        to_byte(rgb[2]),
        alpha.clamp(0.0, 1.0)
    )
}

impl Canvas2dRenderer {
    pub fn new(canvas: web::HtmlCanvasElement) -> Result<Self, BackdropError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
            .ok_or(BackdropError::NoContext("2d"))?;
        let (_, _, ratio) = dom::sync_canvas_backing_size(&canvas, 1.0);
        log::info!("[canvas2d] context ready");
        Ok(Self {
            canvas,
            ctx,
            pixel_ratio_cap: 1.0,
            ratio,
            released: false,
        })
    }

    /// CSS size of the canvas; the host sizes the flat field from this.
    pub fn css_size(&self) -> (u32, u32) {
        dom::css_size(&self.canvas)
    }

    fn sync(&mut self) {
        let (_, _, ratio) = dom::sync_canvas_backing_size(&self.canvas, self.pixel_ratio_cap);
        self.ratio = ratio;
    }
}

impl Renderer for Canvas2dRenderer {
    fn draw(&mut self, scene: &Scene<'_>) -> anyhow::Result<()> {
        if self.released {
            return Ok(());
        }
        let ctx = &self.ctx;
        ctx.set_transform(self.ratio, 0.0, 0.0, self.ratio, 0.0, 0.0)
            .map_err(|e| anyhow::anyhow!("setTransform: {:?}", e))?;
        let w = self.canvas.width() as f64 / self.ratio;
        let h = self.canvas.height() as f64 / self.ratio;
        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_global_alpha(scene.style.opacity as f64);

        if !scene.links.is_empty() {
            ctx.set_line_width(1.0);
            for link in scene.links {
                let (Some(a), Some(b)) = (
                    scene.positions.get(link.a as usize),
                    scene.positions.get(link.b as usize),
                ) else {
                    continue;
                };
                ctx.set_stroke_style_str(&css_rgba(
                    scene.style.link_color,
                    LINK_BASE_ALPHA * link.strength,
                ));
                ctx.begin_path();
                ctx.move_to(a.x as f64, a.y as f64);
                ctx.line_to(b.x as f64, b.y as f64);
                ctx.stroke();
            }
        }

        for ((p, c), s) in scene.positions.iter().zip(scene.colors).zip(scene.sizes) {
            let radius = (*s * scene.point_scale * 0.5).max(0.5) as f64;
            ctx.set_fill_style_str(&css_rgba([c.x, c.y, c.z], 1.0));
            ctx.begin_path();
            ctx.arc(p.x as f64, p.y as f64, radius, 0.0, TAU)
                .map_err(|e| anyhow::anyhow!("arc: {:?}", e))?;
            ctx.fill();
        }

        let spark_radius = (BURST_SPARK_SIZE * scene.point_scale * 0.5).max(0.5) as f64;
        for sp in scene.sparks {
            ctx.set_fill_style_str(&css_rgba(sp.color.to_array(), sp.opacity));
            ctx.begin_path();
            ctx.arc(sp.position.x as f64, sp.position.y as f64, spark_radius, 0.0, TAU)
                .map_err(|e| anyhow::anyhow!("arc: {:?}", e))?;
            ctx.fill();
        }
        Ok(())
    }

    fn set_pixel_ratio_cap(&mut self, cap: f32) {
        self.pixel_ratio_cap = cap;
        if !self.released {
            self.sync();
        }
    }

    fn resize(&mut self, _width: u32, _height: u32) {
        if !self.released {
            self.sync();
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.canvas.remove();
        log::info!("[canvas2d] released");
    }
}
