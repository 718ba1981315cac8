use crate::core::anchors::{NamedAnchor, POINTS_OF_INTEREST};
use crate::core::constants::*;
use crate::core::materials::{lab_overrides, MaterialOverride};
use crate::core::orbit::OrbitSettings;

/// Everything that tunes the lab scene, owned by the application context.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub model_url: String,
    pub texture_url: String,
    pub anchors: &'static [NamedAnchor],
    pub label_distance_sq: f32,
    pub orbit: OrbitSettings,
    pub max_pixel_ratio: f32,
    pub clear_color: [f64; 3],
    pub material_overrides: Vec<MaterialOverride>,
}

pub const MODEL_URL: &str = "spmaglab_model.glb";
pub const TEXTURE_URL: &str = "spmaglab_color.jpg";

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_url: MODEL_URL.to_string(),
            texture_url: TEXTURE_URL.to_string(),
            anchors: POINTS_OF_INTEREST,
            label_distance_sq: LABEL_VISIBILITY_DISTANCE_SQ,
            orbit: OrbitSettings::default(),
            max_pixel_ratio: MAX_PIXEL_RATIO,
            clear_color: hex_to_linear_rgb(CLEAR_COLOR_HEX),
            material_overrides: lab_overrides(),
        }
    }
}

#[inline]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` in sRGB to linear RGB, for clearing an sRGB surface.
pub fn hex_to_linear_rgb(hex: u32) -> [f64; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f64 / 255.0);
    [channel(16), channel(8), channel(0)]
}
