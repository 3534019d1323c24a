//! Shared numeric constants for the editor.

// ── Viewport ────────────────────────────────────────────────────

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1200;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;

/// Default frame rate for hosts that pace the loop.
pub const DEFAULT_FPS: u32 = 60;

// ── Camera ──────────────────────────────────────────────────────

/// Multiplicative zoom change per scroll notch.
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom floor. Repeated scroll-down never reaches zero or below.
pub const MIN_ZOOM: f64 = 0.01;

/// Zoom ceiling.
pub const MAX_ZOOM: f64 = 100.0;

// ── Editing ─────────────────────────────────────────────────────

/// World units moved per arrow key press.
pub const MOVE_STEP: i32 = 1;

// ── Rendering ───────────────────────────────────────────────────

/// Static pin fill (brown).
pub const PIN_COLOR: [u8; 3] = [165, 42, 42];

/// Dynamic anchor fill (white).
pub const ANCHOR_COLOR: [u8; 3] = [255, 255, 255];

/// Hitbox overlay outline (green).
pub const HITBOX_COLOR: [u8; 3] = [0, 255, 0];

/// Highlighted shape outline (yellow).
pub const HIGHLIGHT_COLOR: [u8; 3] = [255, 255, 0];

/// Selection rectangle outline (green).
pub const SELECTION_COLOR: [u8; 3] = [0, 255, 0];

/// Clear color for each frame (black).
pub const BACKGROUND_COLOR: [u8; 3] = [0, 0, 0];

// ── Converter ───────────────────────────────────────────────────

/// Default converter executable name.
pub const DEFAULT_CONVERTER: &str = "PolyConverter.exe";

pub const CONVERTER_SUCCESS: i32 = 0;
pub const CONVERTER_JSON_ERROR: i32 = 1;
pub const CONVERTER_CONVERSION_ERROR: i32 = 2;
pub const CONVERTER_FILE_ERROR: i32 = 3;
pub const CONVERTER_GAMEPATH_ERROR: i32 = 4;

/// Converter stdout shorter than this means nothing was written.
pub const CONVERTER_MIN_REPORT_LEN: usize = 6;
