pub mod anchors;
pub mod animation;
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod materials;
pub mod model;
pub mod orbit;
pub mod overlay;
pub mod scene;
pub mod stage;
pub mod texture;
pub mod viewport;

pub use camera::PerspectiveCamera;
pub use config::SceneConfig;
pub use error::SceneError;
pub use lifecycle::SceneLifecycle;
pub use model::LabModel;
pub use orbit::OrbitControls;
pub use overlay::{LabelElement, ScreenOffset};
pub use stage::Stage;
pub use texture::BakedTexture;
pub use viewport::Viewport;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
