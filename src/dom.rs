use crate::app::LaunchEnv;
use crate::constants::*;
use crate::core::{BoundaryPolicy, CapabilityProbe, Theme};
use crate::error::BackdropError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const CANVAS_STYLE: &str =
    "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:1;";

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn prefers_reduced_motion(window: &web::Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// `navigator.gpu` is present (WebGPU exposed by the browser).
pub fn webgpu_available(window: &web::Window) -> bool {
    js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("gpu"))
        .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
        .unwrap_or(false)
}

pub fn probe_capabilities(window: &web::Window) -> CapabilityProbe {
    let viewport_width = window.inner_width().ok().and_then(|v| v.as_f64());
    let cores = window.navigator().hardware_concurrency();
    let parallelism = (cores.is_finite() && cores >= 1.0).then_some(cores as u32);
    CapabilityProbe {
        viewport_width,
        parallelism,
        gpu_available: webgpu_available(window),
    }
}

/// Theme marker on `<body class>`.
pub fn body_theme(document: &web::Document) -> Theme {
    match document.body() {
        Some(body) if body.class_list().contains(LIGHT_THEME_CLASS) => Theme::Light,
        _ => Theme::Dark,
    }
}

/// Persisted preference first, then the body marker.
pub fn stored_theme(window: &web::Window, document: &web::Document) -> Theme {
    window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(THEME_STORAGE_KEY).ok().flatten())
        .and_then(|v| Theme::parse(&v))
        .unwrap_or_else(|| body_theme(document))
}

pub fn launch_env(window: &web::Window, document: &web::Document) -> LaunchEnv {
    LaunchEnv {
        reduced_motion: prefers_reduced_motion(window),
        probe: probe_capabilities(window),
        theme: stored_theme(window, document),
    }
}

pub fn find_container(document: &web::Document) -> Result<web::Element, BackdropError> {
    document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| BackdropError::MissingContainer(CONTAINER_ID.to_string()))
}

/// `data-boundary` and `data-seed` on the container.
pub struct ContainerOverrides {
    pub boundary: Option<BoundaryPolicy>,
    pub seed: Option<u64>,
}

pub fn container_overrides(container: &web::Element) -> ContainerOverrides {
    let boundary = container
        .get_attribute("data-boundary")
        .and_then(|v| BoundaryPolicy::parse(&v));
    let seed = container
        .get_attribute("data-seed")
        .and_then(|v| v.trim().parse::<u64>().ok());
    ContainerOverrides { boundary, seed }
}

pub fn create_canvas(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas
        .set_attribute("style", CANVAS_STYLE)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// CSS size of the canvas in pixels, never zero.
pub fn css_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let rect = canvas.get_bounding_client_rect();
    (
        (rect.width().round() as u32).max(1),
        (rect.height().round() as u32).max(1),
    )
}

/// Match the backing store to CSS size × min(devicePixelRatio, cap).
/// Returns the backing size and the ratio used.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    pixel_ratio_cap: f32,
) -> (u32, u32, f64) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let ratio = dpr.min(pixel_ratio_cap as f64).max(0.5);
    let rect = canvas.get_bounding_client_rect();
    let w_px = ((rect.width() * ratio) as u32).max(1);
    let h_px = ((rect.height() * ratio) as u32).max(1);
    if canvas.width() != w_px {
        canvas.set_width(w_px);
    }
    if canvas.height() != h_px {
        canvas.set_height(h_px);
    }
    (w_px, h_px, ratio)
}
