use crate::core::animation::AnimationMixer;
use crate::core::camera::PerspectiveCamera;
use crate::core::lifecycle::SceneLifecycle;
use crate::core::model::LabModel;
use crate::core::overlay::{AnchorRegistry, LabelElement};
use crate::core::viewport::Viewport;

/// Everything that exists only once the model has loaded.
pub struct Stage<E> {
    pub model: LabModel,
    pub mixer: Option<AnimationMixer>,
    pub anchors: AnchorRegistry<E>,
}

impl<E> Stage<E> {
    /// Play the model's first animation clip, if it has one.
    pub fn new(model: LabModel, anchors: AnchorRegistry<E>) -> Self {
        let mixer = model.animations.first().cloned().map(AnimationMixer::new);
        Self {
            model,
            mixer,
            anchors,
        }
    }

    pub fn advance(&mut self, dt_sec: f32) {
        if let Some(mixer) = &mut self.mixer {
            mixer.update(dt_sec);
            mixer.apply(&mut self.model.graph);
        }
    }
}

impl<E: LabelElement> SceneLifecycle<Stage<E>> {
    /// Reposition labels for the current camera. Writes nothing until the scene is ready.
    pub fn refresh_labels(
        &self,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        threshold_sq: f32,
    ) -> usize {
        match self.ready() {
            Some(stage) => stage.anchors.update(camera, viewport, threshold_sq),
            None => 0,
        }
    }
}
