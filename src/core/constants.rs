// Scene tuning constants shared by the pure core and the web frontend.

// Labels are shown only while the camera is this close (squared units) to the origin
pub const LABEL_VISIBILITY_DISTANCE_SQ: f32 = 6.5;

// Camera
pub const CAMERA_FOV_Y_DEGREES: f32 = 30.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_START: [f32; 3] = [3.0, 2.0, -5.0];

// Orbit controls
pub const ORBIT_TARGET: [f32; 3] = [0.0, 0.0, 0.0];
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;
pub const ORBIT_ROTATE_SPEED: f32 = 0.5;
pub const ORBIT_ZOOM_SPEED: f32 = 0.5;
pub const ORBIT_MIN_DISTANCE: f32 = 1.0;
pub const ORBIT_MAX_DISTANCE: f32 = 10.0;
pub const ORBIT_MIN_POLAR: f32 = 0.0;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI / 2.5;
pub const ORBIT_MIN_AZIMUTH: f32 = 1.0;
pub const ORBIT_MAX_AZIMUTH: f32 = 3.3;

// Renderer
pub const MAX_PIXEL_RATIO: f32 = 2.0;
pub const CLEAR_COLOR_HEX: u32 = 0x716450;
pub const MSAA_SAMPLES: u32 = 4;

// Model placement in world space
pub const MODEL_SCALE: f32 = 0.03;
pub const MODEL_ROTATION_Y: f32 = -2.0; // radians
pub const MODEL_OFFSET: [f32; 3] = [0.3, -0.5, 0.0];

// Transparent material overrides
pub const CLEAR_PLASTIC_NODES: &[&str] = &[
    "Cube004", "Cube137", "Cube138", "Cube139", "Cube140", "Cube141", "Cube142", "Cube143",
    "Cube144", "Cube012", "Cube317",
];
pub const CLEAR_PLASTIC_OPACITY: f32 = 0.2;

pub const TINTED_PLASTIC_NODES: &[&str] = &[
    "Cube122",
    "Cube068",
    "Cylinder026",
    "Cylinder",
    "Cube345",
    "Cylinder206",
    "Cube092",
];
pub const TINTED_PLASTIC_OPACITY: f32 = 0.65;

pub const PLASTIC_ROUGHNESS: f32 = 0.0;
