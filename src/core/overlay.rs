// Screen-space labels that follow fixed world points.
//
// Every frame each anchor is projected through the camera into normalized
// device coordinates and then into a pixel offset from the viewport center.
// Visibility is a single distance gate on the camera, shared by all labels;
// the model never occludes a label.

use glam::Vec3;

use crate::core::anchors::NamedAnchor;
use crate::core::camera::PerspectiveCamera;
use crate::core::error::SceneError;
use crate::core::viewport::Viewport;

/// Pixel offset of a label from the viewport center. +y points down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenOffset {
    pub x: f32,
    pub y: f32,
}

/// Anything that can display a label. The browser implements this for DOM elements.
pub trait LabelElement {
    fn set_visible(&self, visible: bool);
    fn set_offset(&self, offset: ScreenOffset);
}

#[inline]
pub fn project_to_ndc(world: Vec3, camera: &PerspectiveCamera) -> Vec3 {
    camera.view_projection().project_point3(world)
}

#[inline]
pub fn ndc_to_offset(ndc: Vec3, viewport: &Viewport) -> ScreenOffset {
    ScreenOffset {
        x: ndc.x * viewport.width * 0.5,
        y: -ndc.y * viewport.height * 0.5,
    }
}

/// Project a world-space point to its pixel offset from the viewport center.
#[inline]
pub fn project(world: Vec3, camera: &PerspectiveCamera, viewport: &Viewport) -> ScreenOffset {
    ndc_to_offset(project_to_ndc(world, camera), viewport)
}

/// Labels show while the camera is strictly closer than the threshold (squared distance).
#[inline]
pub fn labels_visible(camera_position: Vec3, threshold_sq: f32) -> bool {
    camera_position.length_squared() < threshold_sq
}

pub fn css_transform(offset: ScreenOffset) -> String {
    format!("translateX({}px) translateY({}px)", offset.x, offset.y)
}

#[derive(Debug)]
pub struct Anchor<E> {
    pub name: &'static str,
    pub position: Vec3,
    pub element: E,
}

/// Fixed, ordered set of anchors bound to their label elements.
#[derive(Debug)]
pub struct AnchorRegistry<E> {
    anchors: Vec<Anchor<E>>,
}

impl<E> Default for AnchorRegistry<E> {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }
}

impl<E> AnchorRegistry<E> {
    /// Pair each named anchor with the element created for it, in order.
    pub fn bind(list: &[NamedAnchor], elements: Vec<E>) -> Result<Self, SceneError> {
        if list.len() != elements.len() {
            return Err(SceneError::AnchorCountMismatch {
                expected: list.len(),
                actual: elements.len(),
            });
        }
        let anchors = list
            .iter()
            .zip(elements)
            .map(|(named, element)| Anchor {
                name: named.name,
                position: Vec3::from(named.position),
                element,
            })
            .collect();
        Ok(Self { anchors })
    }

    pub fn push(&mut self, name: &'static str, position: Vec3, element: E) {
        self.anchors.push(Anchor {
            name,
            position,
            element,
        });
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor<E>> {
        self.anchors.iter()
    }
}

impl<E: LabelElement> AnchorRegistry<E> {
    /// Write visibility and position to every label. Returns the number of labels touched.
    pub fn update(&self, camera: &PerspectiveCamera, viewport: &Viewport, threshold_sq: f32) -> usize {
        let visible = labels_visible(camera.position, threshold_sq);
        let view_proj = camera.view_projection();
        for anchor in &self.anchors {
            let ndc = view_proj.project_point3(anchor.position);
            anchor.element.set_visible(visible);
            anchor.element.set_offset(ndc_to_offset(ndc, viewport));
        }
        self.anchors.len()
    }
}
