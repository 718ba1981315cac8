use thiserror::Error;

/// Failures raised while turning the lab assets into a ready scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no top-level node named `{name}` in the model")]
    MissingNode { name: String },

    #[error("model has no scene")]
    NoScene,

    #[error("unsupported primitive mode {mode} in mesh `{mesh}`")]
    UnsupportedPrimitive { mesh: String, mode: String },

    #[error("mesh `{mesh}` is missing {attribute}")]
    MissingAttribute {
        mesh: String,
        attribute: &'static str,
    },

    #[error("model requires unsupported extension {name}")]
    UnsupportedExtension { name: String },

    #[error("malformed Draco primitive in mesh `{mesh}`: {reason}")]
    MalformedDraco { mesh: String, reason: &'static str },

    #[error("Draco mesh `{mesh}`: {source}")]
    Draco {
        mesh: String,
        #[source]
        source: draco_oxide_decoder::Err,
    },

    #[error("expected {expected} label elements, got {actual}")]
    AnchorCountMismatch { expected: usize, actual: usize },

    #[error("scene lifecycle cannot leave the {from} state")]
    InvalidTransition { from: &'static str },

    #[error("glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("texture: {0}")]
    Image(#[from] image::ImageError),
}
