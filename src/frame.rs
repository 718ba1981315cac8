use crate::assets::LoadedLab;
use crate::core::anchors::NamedAnchor;
use crate::core::clock::FrameClock;
use crate::core::input::PointerTracker;
use crate::core::overlay::AnchorRegistry;
use crate::core::{
    OrbitControls, PerspectiveCamera, SceneConfig, SceneLifecycle, Stage, Viewport,
};
use crate::dom;
use crate::render;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// All mutable viewer state, owned in one place and shared by the frame loop,
/// the resize listener and the pointer listeners on the JS thread.
pub struct AppContext<'a> {
    pub canvas: web::HtmlCanvasElement,
    pub config: SceneConfig,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub pointers: PointerTracker,
    pub viewport: Viewport,
    pub scene: SceneLifecycle<Stage<web::HtmlElement>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub clock: FrameClock,
    // Label elements exist from startup; they join the registry when the model is ready
    pending_labels: Option<Vec<web::HtmlElement>>,
}

impl<'a> AppContext<'a> {
    pub fn new(
        canvas: web::HtmlCanvasElement,
        config: SceneConfig,
        viewport: Viewport,
        labels: Vec<web::HtmlElement>,
    ) -> Self {
        let mut camera = PerspectiveCamera::lab_default(viewport.aspect());
        camera.look_at(config.orbit.target);
        let controls = OrbitControls::new(config.orbit.clone());
        Self {
            canvas,
            config,
            camera,
            controls,
            pointers: PointerTracker::default(),
            viewport,
            scene: SceneLifecycle::new(),
            gpu: None,
            clock: FrameClock::new(),
            pending_labels: Some(labels),
        }
    }

    pub fn frame(&mut self) {
        let (_elapsed, dt_sec) = self.clock.tick();

        if let Some(stage) = self.scene.ready_mut() {
            stage.advance(dt_sec);
        }

        self.controls.update(&mut self.camera);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            let model = self.scene.ready().map(|stage| &stage.model);
            match g.render(&self.camera, model) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
                Err(e) => log::error!("render error: {:?}", e),
            }
        }

        self.scene
            .refresh_labels(&self.camera, &self.viewport, self.config.label_distance_sq);
    }

    /// React to a viewport size change: camera projection, canvas size and surface.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport
            .resize(width, height, device_pixel_ratio, self.config.max_pixel_ratio);
        self.camera.set_aspect(self.viewport.width, self.viewport.height);
        dom::apply_canvas_size(&self.canvas, &self.viewport);
        let (w_px, h_px) = self.viewport.render_size();
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w_px, h_px);
        }
        log::debug!(
            "[resize] {}x{} css, {}x{} px",
            self.viewport.width,
            self.viewport.height,
            w_px,
            h_px
        );
    }

    /// Settle the asynchronous asset load; the scene becomes ready or failed.
    pub fn finish_loading(&mut self, loaded: anyhow::Result<LoadedLab>) {
        let anchors: &[NamedAnchor] = self.config.anchors;
        let labels = self.pending_labels.take().unwrap_or_default();
        let stage = loaded.and_then(|lab| {
            let registry = AnchorRegistry::bind(anchors, labels)?;
            if let Some(g) = &mut self.gpu {
                g.upload(&lab.model, &lab.texture);
            }
            Ok(Stage::new(lab.model, registry))
        });
        let outcome = stage.map_err(|e| format!("{:#}", e));
        if let Err(reason) = &outcome {
            log::error!("[scene] load failed: {}", reason);
        }
        if let Err(e) = self.scene.finish(outcome) {
            log::warn!("[scene] {}", e);
            return;
        }
        if let Some(stage) = self.scene.ready() {
            log::info!(
                "[scene] ready: anchors={} animated={}",
                stage.anchors.len(),
                stage.mixer.is_some()
            );
            if let Some(document) = dom::window_document() {
                dom::mark_loading_done(&document);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    config: &SceneConfig,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(
        leaked_canvas,
        config.clear_color,
        crate::core::constants::MSAA_SAMPLES,
    )
    .await
    {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(ctx: Rc<RefCell<AppContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
