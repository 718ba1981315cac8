use crate::core::input::Gesture;
use crate::dom;
use crate::frame::AppContext;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Ctx = Rc<RefCell<AppContext<'static>>>;

#[inline]
fn pointer_pos(ev: &web::PointerEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

fn apply_gesture(ctx: &mut AppContext, gesture: Gesture) {
    match gesture {
        Gesture::None => {}
        Gesture::Rotate { dx, dy } => {
            let height = ctx.canvas.client_height() as f32;
            ctx.controls.rotate_by_pixels(dx, dy, height);
        }
        Gesture::PinchStart { distance } => ctx.controls.pinch_start(distance),
        Gesture::Pinch { distance } => ctx.controls.pinch_move(distance),
        Gesture::PinchEnd => ctx.controls.pinch_end(),
    }
}

/// Drag to orbit, wheel or pinch to zoom. All input lands on the canvas.
pub fn wire_orbit_input(canvas: &web::HtmlCanvasElement, ctx: Ctx) {
    wire_pointerdown(canvas, ctx.clone());
    wire_pointermove(canvas, ctx.clone());
    wire_pointerup(canvas, "pointerup", ctx.clone());
    wire_pointerup(canvas, "pointercancel", ctx.clone());
    wire_wheel(canvas, ctx);
}

fn wire_pointerdown(canvas: &web::HtmlCanvasElement, ctx: Ctx) {
    let canvas_capture = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut c = ctx.borrow_mut();
        let gesture = c.pointers.down(ev.pointer_id(), pointer_pos(&ev));
        apply_gesture(&mut c, gesture);
        _ = canvas_capture.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, ctx: Ctx) {
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut c = ctx.borrow_mut();
        let gesture = c.pointers.moved(ev.pointer_id(), pointer_pos(&ev));
        apply_gesture(&mut c, gesture);
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(canvas: &web::HtmlCanvasElement, event: &str, ctx: Ctx) {
    let canvas_release = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut c = ctx.borrow_mut();
        let gesture = c.pointers.up(ev.pointer_id());
        apply_gesture(&mut c, gesture);
        _ = canvas_release.release_pointer_capture(ev.pointer_id());
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, ctx: Ctx) {
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        ctx.borrow_mut().controls.dolly_wheel(ev.delta_y() as f32);
    }) as Box<dyn FnMut(_)>);
    // Non-passive so the page does not scroll while zooming
    let options = web::AddEventListenerOptions::new();
    options.set_passive(false);
    _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &options,
    );
    closure.forget();
}

/// Keep the camera and render target in step with the window size.
pub fn wire_resize(ctx: Ctx) {
    let closure = Closure::wrap(Box::new(move || {
        if let Some(window) = web::window() {
            let (w, h, dpr) = dom::window_metrics(&window);
            ctx.borrow_mut().resize(w, h, dpr);
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
