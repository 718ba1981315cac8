use crate::constants::{
    LABEL_BADGE_CLASS, LABEL_TEXT_CLASS, LABEL_VISIBLE_CLASS, LOADING_BAR_ID, LOADING_DONE_CLASS,
};
use crate::core::anchors::{label_badge, label_class, NamedAnchor};
use crate::core::overlay::{css_transform, LabelElement, ScreenOffset};
use crate::core::Viewport;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Current window size in CSS pixels and the device pixel ratio.
pub fn window_metrics(window: &web::Window) -> (f32, f32, f32) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    (width as f32, height as f32, window.device_pixel_ratio() as f32)
}

/// Size the canvas to the viewport: CSS size in CSS pixels, backing store in device pixels.
pub fn apply_canvas_size(canvas: &web::HtmlCanvasElement, viewport: &Viewport) {
    let (w_px, h_px) = viewport.render_size();
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", viewport.width));
    _ = style.set_property("height", &format!("{}px", viewport.height));
}

fn create_div(document: &web::Document, class: &str) -> anyhow::Result<web::HtmlElement> {
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_class_name(class);
    el.dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Build `div.point.point-{i} > div.label + div.text` and insert it before the loading bar.
pub fn create_point_label(
    document: &web::Document,
    index: usize,
    anchor: &NamedAnchor,
) -> anyhow::Result<web::HtmlElement> {
    let point = create_div(document, &label_class(index))?;

    let badge = create_div(document, LABEL_BADGE_CLASS)?;
    badge.set_text_content(Some(&label_badge(index)));
    point
        .append_child(&badge)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let text = create_div(document, LABEL_TEXT_CLASS)?;
    text.set_text_content(Some(anchor.name));
    point
        .append_child(&text)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    let reference = document
        .get_element_by_id(LOADING_BAR_ID)
        .map(web::Node::from);
    body.insert_before(&point, reference.as_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(point)
}

pub fn create_point_labels(
    document: &web::Document,
    anchors: &[NamedAnchor],
) -> anyhow::Result<Vec<web::HtmlElement>> {
    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| create_point_label(document, i, anchor))
        .collect()
}

pub fn mark_loading_done(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_BAR_ID) {
        _ = el.class_list().add_1(LOADING_DONE_CLASS);
    }
}

impl LabelElement for web::HtmlElement {
    fn set_visible(&self, visible: bool) {
        let cl = self.class_list();
        if visible {
            _ = cl.add_1(LABEL_VISIBLE_CLASS);
        } else {
            _ = cl.remove_1(LABEL_VISIBLE_CLASS);
        }
    }

    fn set_offset(&self, offset: ScreenOffset) {
        _ = self.style().set_property("transform", &css_transform(offset));
    }
}
