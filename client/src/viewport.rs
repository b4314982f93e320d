use crate::surface::MapSurface;

/// Logical coordinate space of the map asset. The view box stays fixed at
/// this size; only the display size changes with the window.
pub const ORIG_WIDTH: f64 = 1227.0;
pub const ORIG_HEIGHT: f64 = 628.0;

/// Fraction of the window width the map occupies.
const MAP_TO_WIDTH_SCALE: f64 = 0.8;

/// Display scale factor for a given window width.
pub fn compute_scale(window_width: f64) -> f64 {
    window_width * MAP_TO_WIDTH_SCALE / ORIG_WIDTH
}

pub fn scaled_size(scale: f64) -> (f64, f64) {
    (ORIG_WIDTH * scale, ORIG_HEIGHT * scale)
}

/// Rescale the surface to the given window width, preserving the logical
/// view box. Cosmetic only — never touches game data — and idempotent:
/// repeated calls with the same width are no-ops in effect.
pub fn apply_to<S: MapSurface>(surface: &S, window_width: f64) {
    let (width, height) = scaled_size(compute_scale(window_width));
    surface.resize(width, height, ORIG_WIDTH, ORIG_HEIGHT);
}

/// Rescale to the current window width. No-op when the window is not
/// available.
pub fn apply_current<S: MapSurface>(surface: &S) {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64());
    if let Some(width) = width {
        apply_to(surface, width);
    }
}
