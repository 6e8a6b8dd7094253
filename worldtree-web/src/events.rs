//! DOM-independent pieces of browser event handling.

/// `WheelEvent.deltaMode` values.
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

/// Pixels per line for line-mode wheel events (Firefox reports lines).
const LINE_HEIGHT_PX: f32 = 16.0;

/// Convert a wheel `deltaY` to pixels regardless of the reporting mode.
pub fn wheel_delta_pixels(delta_y: f64, delta_mode: u32, page_height: f32) -> f32 {
    let delta = delta_y as f32;
    match delta_mode {
        DOM_DELTA_LINE => delta * LINE_HEIGHT_PX,
        DOM_DELTA_PAGE => delta * page_height,
        _ => delta,
    }
}

/// Pointer types that should drive mouse look. Touch and pen pointers would
/// turn the camera on every tap.
pub fn is_look_pointer(pointer_type: &str) -> bool {
    pointer_type.is_empty() || pointer_type == "mouse"
}
