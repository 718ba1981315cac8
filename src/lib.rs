#![cfg(target_arch = "wasm32")]
use crate::core::{SceneConfig, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod render;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("lab-viewer starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .query_selector(constants::CANVAS_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("missing {}", constants::CANVAS_SELECTOR))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let config = SceneConfig::default();

    // Labels exist from the start, hidden until the scene is ready
    let labels = dom::create_point_labels(&document, config.anchors)?;

    let (width, height, dpr) = dom::window_metrics(&window);
    let viewport = Viewport::new(width, height, dpr, config.max_pixel_ratio);
    dom::apply_canvas_size(&canvas, &viewport);

    let gpu = frame::init_gpu(&canvas, &config).await;

    let ctx = Rc::new(RefCell::new(frame::AppContext::new(
        canvas.clone(),
        config.clone(),
        viewport,
        labels,
    )));
    ctx.borrow_mut().gpu = gpu;

    events::wire_resize(ctx.clone());
    events::wire_orbit_input(&canvas, ctx.clone());

    // Fire-and-forget model load; the frame loop runs in the meantime
    let ctx_load = ctx.clone();
    spawn_local(async move {
        let loaded = assets::load_lab(&config).await;
        ctx_load.borrow_mut().finish_loading(loaded);
    });

    frame::start_loop(ctx);
    Ok(())
}
