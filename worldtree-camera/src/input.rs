//! Input aggregation: raw device events in, per-frame [`InputSnapshot`] out.
//!
//! Mouse offsets are measured from an origin fixed at the first pointer
//! movement of the session and re-baselined whenever the pointer re-enters
//! the viewport. Holding the cursor away from the origin keeps turning the
//! camera.

use std::collections::HashSet;

use glam::Vec2;

use crate::activation::{ActivationRequest, MouseActivation};
use crate::config::CameraConfig;
use crate::keys::{is_navigation_key, Modifiers};

/// Viewport size in pixels, used to normalize pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pixel position (origin top-left) to normalized device coordinates.
    /// X grows right, Y grows up, both span -1..+1 across the viewport.
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new((x / w) * 2.0 - 1.0, 1.0 - (y / h) * 2.0)
    }
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDisposition {
    /// The key was recorded as held.
    pub recorded: bool,
    /// The host should cancel the browser's default action.
    pub suppress_default: bool,
}

/// Raw input state mutated by event handlers.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Held key codes (DOM `KeyboardEvent.code`).
    pub keys_down: HashSet<String>,
    /// Offset from `origin` in NDC. Zero while the pointer is outside.
    pub mouse_offset: Vec2,
    /// Reference point the offset is measured from.
    pub origin: Option<Vec2>,
    pub pointer_inside: bool,
    /// Vertical velocity contribution accumulated since the last snapshot.
    pub wheel: f32,
}

/// Immutable per-frame view of the input, handed to the simulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys_down: HashSet<String>,
    pub mouse_offset: Vec2,
    /// Mouse look gate: true once the startup delay has elapsed.
    pub mouse_active: bool,
    pub pointer_inside: bool,
    /// Wheel-derived vertical velocity to apply this frame.
    pub wheel: f32,
}

impl InputSnapshot {
    /// Snapshot with the given keys held and nothing else going on.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys_down: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Translates device events into [`InputState`]. Never touches the camera.
#[derive(Debug, Clone)]
pub struct InputAggregator {
    state: InputState,
    activation: MouseActivation,
    startup_delay_ms: u32,
    wheel_scale: f32,
}

impl InputAggregator {
    pub fn new(startup_delay_ms: u32, wheel_scale: f32) -> Self {
        Self {
            state: InputState::default(),
            activation: MouseActivation::Idle,
            startup_delay_ms,
            wheel_scale,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(config.look.startup_delay_ms, config.motion.wheel_scale)
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn activation(&self) -> MouseActivation {
        self.activation
    }

    // ── Keyboard ──

    /// Record a key press. Shortcut chords are dropped entirely.
    pub fn key_down(&mut self, code: &str, modifiers: Modifiers) -> KeyDisposition {
        if modifiers.is_chord() {
            return KeyDisposition {
                recorded: false,
                suppress_default: false,
            };
        }
        if !self.state.keys_down.contains(code) {
            self.state.keys_down.insert(code.to_string());
        }
        KeyDisposition {
            recorded: true,
            suppress_default: is_navigation_key(code),
        }
    }

    /// Record a key release. Returns whether the key was held.
    pub fn key_up(&mut self, code: &str) -> bool {
        self.state.keys_down.remove(code)
    }

    /// Forget every held key (focus lost).
    pub fn release_all(&mut self) {
        self.state.keys_down.clear();
    }

    pub fn is_key_down(&self, code: &str) -> bool {
        self.state.keys_down.contains(code)
    }

    // ── Pointer ──

    /// Pointer moved to `ndc`. The first movement of the session fixes the
    /// origin and starts activation.
    pub fn pointer_moved(&mut self, ndc: Vec2) -> ActivationRequest {
        self.state.pointer_inside = true;
        let origin = *self.state.origin.get_or_insert(ndc);
        self.state.mouse_offset = ndc - origin;
        self.begin_activation()
    }

    /// Pointer entered the viewport at `ndc`. Re-baselines the origin so the
    /// return does not produce a jump.
    pub fn pointer_entered(&mut self, ndc: Vec2) -> ActivationRequest {
        self.state.pointer_inside = true;
        self.state.origin = Some(ndc);
        self.state.mouse_offset = Vec2::ZERO;
        log::debug!("pointer entered at ({:.3}, {:.3}), origin re-baselined", ndc.x, ndc.y);
        self.begin_activation()
    }

    /// Pointer left the viewport. The offset is zeroed immediately.
    pub fn pointer_left(&mut self) {
        self.state.pointer_inside = false;
        self.state.mouse_offset = Vec2::ZERO;
    }

    /// Startup timer fired.
    pub fn activation_elapsed(&mut self) {
        if self.activation.elapse() {
            log::info!("mouse look active");
        }
    }

    fn begin_activation(&mut self) -> ActivationRequest {
        let request = self.activation.begin(self.startup_delay_ms);
        if let ActivationRequest::StartTimer { delay_ms } = request {
            log::info!("mouse look activates in {delay_ms} ms");
        }
        request
    }

    // ── Wheel ──

    /// Accumulate a wheel delta (DOM `deltaY`: positive scrolls down).
    pub fn wheel(&mut self, delta_y: f32) {
        self.state.wheel -= delta_y * self.wheel_scale;
    }

    // ── Frame hand-off ──

    /// Copy the state for one frame, consuming the accumulated wheel delta.
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            keys_down: self.state.keys_down.clone(),
            mouse_offset: self.state.mouse_offset,
            mouse_active: self.activation.is_active(),
            pointer_inside: self.state.pointer_inside,
            wheel: std::mem::take(&mut self.state.wheel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    // ── Viewport ──

    #[test]
    fn test_ndc_corners_and_center() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(vp.to_ndc(400.0, 300.0), Vec2::ZERO);
    }

    #[test]
    fn test_ndc_zero_size_viewport_is_finite() {
        let vp = Viewport::new(0.0, 0.0);
        let ndc = vp.to_ndc(10.0, 10.0);
        assert!(ndc.x.is_finite() && ndc.y.is_finite());
    }

    // ── Keyboard ──

    #[test]
    fn test_key_down_is_deduplicated() {
        let mut input = InputAggregator::new(0, 1.0);
        input.key_down("KeyW", Modifiers::default());
        input.key_down("KeyW", Modifiers::default());
        assert_eq!(input.state().keys_down.len(), 1);
        assert!(input.key_up("KeyW"));
        assert!(!input.is_key_down("KeyW"));
        assert!(!input.key_up("KeyW"));
    }

    #[test]
    fn test_chord_is_ignored() {
        let mut input = InputAggregator::new(0, 1.0);
        let d = input.key_down("KeyW", ctrl());
        assert!(!d.recorded);
        assert!(!d.suppress_default);
        assert!(input.state().keys_down.is_empty());
    }

    #[test]
    fn test_navigation_keys_suppress_default() {
        let mut input = InputAggregator::new(0, 1.0);
        assert!(input.key_down("ArrowUp", Modifiers::default()).suppress_default);
        assert!(input.key_down("Space", Modifiers::default()).suppress_default);
        assert!(!input.key_down("KeyW", Modifiers::default()).suppress_default);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputAggregator::new(0, 1.0);
        input.key_down("KeyW", Modifiers::default());
        input.key_down("KeyD", Modifiers::default());
        input.release_all();
        assert!(input.snapshot().keys_down.is_empty());
    }

    // ── Pointer & activation ──

    #[test]
    fn test_first_move_starts_timer_and_fixes_origin() {
        let mut input = InputAggregator::new(1500, 1.0);
        let req = input.pointer_moved(Vec2::new(0.2, 0.1));
        assert_eq!(req, ActivationRequest::StartTimer { delay_ms: 1500 });
        assert_eq!(input.activation(), MouseActivation::Pending);
        assert_eq!(input.state().mouse_offset, Vec2::ZERO);

        assert_eq!(input.pointer_moved(Vec2::new(0.5, 0.1)), ActivationRequest::None);
        assert!(approx_eq(input.state().mouse_offset.x, 0.3));
    }

    #[test]
    fn test_offsets_tracked_but_gated_while_pending() {
        let mut input = InputAggregator::new(1000, 1.0);
        input.pointer_moved(Vec2::ZERO);
        input.pointer_moved(Vec2::new(0.8, 0.0));
        let snap = input.snapshot();
        assert!(!snap.mouse_active);
        assert!(approx_eq(snap.mouse_offset.x, 0.8));

        input.activation_elapsed();
        let snap = input.snapshot();
        assert!(snap.mouse_active);
        assert!(approx_eq(snap.mouse_offset.x, 0.8));
    }

    #[test]
    fn test_pointer_enter_starts_activation() {
        let mut input = InputAggregator::new(300, 1.0);
        let req = input.pointer_entered(Vec2::new(-0.5, 0.5));
        assert_eq!(req, ActivationRequest::StartTimer { delay_ms: 300 });
    }

    #[test]
    fn test_leave_zeroes_offset() {
        let mut input = InputAggregator::new(0, 1.0);
        input.pointer_moved(Vec2::ZERO);
        input.pointer_moved(Vec2::new(0.9, -0.4));
        input.pointer_left();
        let snap = input.snapshot();
        assert_eq!(snap.mouse_offset, Vec2::ZERO);
        assert!(!snap.pointer_inside);
    }

    #[test]
    fn test_reenter_rebaselines_without_restarting_delay() {
        let mut input = InputAggregator::new(500, 1.0);
        input.pointer_moved(Vec2::ZERO);
        input.activation_elapsed();
        input.pointer_left();

        let req = input.pointer_entered(Vec2::new(0.9, 0.9));
        assert_eq!(req, ActivationRequest::None);
        assert!(input.activation().is_active());
        assert_eq!(input.state().mouse_offset, Vec2::ZERO);

        input.pointer_moved(Vec2::new(1.0, 0.9));
        assert!(approx_eq(input.state().mouse_offset.x, 0.1));
        assert!(approx_eq(input.state().mouse_offset.y, 0.0));
    }

    #[test]
    fn test_zero_delay_is_active_on_first_move() {
        let mut input = InputAggregator::new(0, 1.0);
        assert_eq!(input.pointer_moved(Vec2::ZERO), ActivationRequest::None);
        assert!(input.snapshot().mouse_active);
    }

    // ── Wheel ──

    #[test]
    fn test_wheel_accumulates_and_is_consumed() {
        let mut input = InputAggregator::new(0, 0.01);
        input.wheel(-100.0);
        input.wheel(-50.0);
        assert!(approx_eq(input.snapshot().wheel, 1.5));
        assert_eq!(input.snapshot().wheel, 0.0);
    }

    #[test]
    fn test_wheel_down_descends() {
        let mut input = InputAggregator::new(0, 0.01);
        input.wheel(100.0);
        assert!(input.snapshot().wheel < 0.0);
    }

    #[test]
    fn test_snapshot_does_not_clear_keys() {
        let mut input = InputAggregator::new(0, 1.0);
        input.key_down("KeyW", Modifiers::default());
        input.snapshot();
        assert!(input.snapshot().keys_down.contains("KeyW"));
    }
}
