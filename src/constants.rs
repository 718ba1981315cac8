// DOM hooks used by the web frontend.

pub const CANVAS_SELECTOR: &str = "canvas.webgl";
pub const LOADING_BAR_ID: &str = "loading-bar";

// Label markup
pub const LABEL_VISIBLE_CLASS: &str = "visible";
pub const LABEL_BADGE_CLASS: &str = "label";
pub const LABEL_TEXT_CLASS: &str = "text";
pub const LOADING_DONE_CLASS: &str = "ended";
