//! Frame-stepped free camera: momentum translation, eased mouse look,
//! height and radial clamping.

use glam::{Vec2, Vec3};

use crate::camera::{orientation_from_yaw_pitch, yaw_pitch_from_forward, CameraRig};
use crate::config::{BoundaryConfig, CameraConfig, LookConfig, MotionConfig};
use crate::input::InputSnapshot;
use crate::math::{apply_dead_zone_2d, clamp_to_sphere, ease_toward, horizontal_basis};

/// Motion state owned by the controller. Speeds are per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraKinematics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Accumulated, never wrapped.
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_speed: f32,
    pub pitch_speed: f32,
}

/// Which constraints bit during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampReport {
    pub height: bool,
    pub radial: bool,
    pub pitch: bool,
}

/// Cinematic free-fly controller.
///
/// - Bound movement keys: set velocity to `move_speed` along the summed direction
/// - No keys: velocity decays by the friction factors
/// - Wheel: direct vertical velocity contribution
/// - Mouse offset (once active): eased yaw/pitch speed beyond the dead zone
pub struct FreeCameraController {
    config: CameraConfig,
    kinematics: CameraKinematics,
    last_clamp: ClampReport,
}

impl FreeCameraController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            kinematics: CameraKinematics::default(),
            last_clamp: ClampReport::default(),
        }
    }

    /// Create a controller starting from the camera's current pose.
    pub fn attached_to(config: CameraConfig, camera: &impl CameraRig) -> Self {
        let mut controller = Self::new(config);
        controller.sync_with_camera(camera);
        controller
    }

    /// Initialize position, yaw and pitch from the camera.
    pub fn sync_with_camera(&mut self, camera: &impl CameraRig) {
        let (yaw, pitch) = yaw_pitch_from_forward(camera.forward().normalize_or_zero());
        self.kinematics.position = camera.position();
        self.kinematics.yaw = yaw;
        self.kinematics.pitch = pitch.clamp(-self.config.look.pitch_limit, self.config.look.pitch_limit);
    }

    /// Stop all motion, keeping position and orientation.
    pub fn reset(&mut self) {
        self.kinematics.velocity = Vec3::ZERO;
        self.kinematics.yaw_speed = 0.0;
        self.kinematics.pitch_speed = 0.0;
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn kinematics(&self) -> &CameraKinematics {
        &self.kinematics
    }

    /// Overwrite the motion state (teleports, tests).
    pub fn set_kinematics(&mut self, kinematics: CameraKinematics) {
        self.kinematics = kinematics;
    }

    pub fn last_clamp(&self) -> ClampReport {
        self.last_clamp
    }

    /// Advance one frame and write the new pose to `camera`.
    pub fn step(&mut self, input: &InputSnapshot, camera: &mut impl CameraRig) {
        let k = &mut self.kinematics;

        let (forward, right) = horizontal_basis(camera.forward(), k.yaw);
        let desired = self.config.keys.desired_direction(&input.keys_down, forward, right);
        update_velocity(&mut k.velocity, desired, &self.config.motion);

        k.velocity.y += input.wheel;
        k.position += k.velocity;

        let height = clamp_height(k, &self.config.bounds);
        let radial = clamp_radial(k, &self.config.bounds);

        let pitch = update_look(k, input, &self.config.look);

        self.last_clamp = ClampReport {
            height,
            radial,
            pitch,
        };
        if height || radial {
            log::trace!(
                "boundary hit at ({:.2}, {:.2}, {:.2})",
                k.position.x,
                k.position.y,
                k.position.z
            );
        }

        camera.set_position(k.position);
        camera.set_orientation(orientation_from_yaw_pitch(k.yaw, k.pitch));
    }
}

/// Input overrides velocity outright; without input each axis group decays.
fn update_velocity(velocity: &mut Vec3, desired: Vec3, motion: &MotionConfig) {
    if desired != Vec3::ZERO {
        *velocity = desired.normalize() * motion.move_speed;
    } else {
        velocity.x *= motion.friction_horizontal;
        velocity.z *= motion.friction_horizontal;
        velocity.y *= motion.friction_vertical;
    }
}

fn clamp_height(k: &mut CameraKinematics, bounds: &BoundaryConfig) -> bool {
    if k.position.y < bounds.min_height {
        k.position.y = bounds.min_height;
    } else if k.position.y > bounds.max_height {
        k.position.y = bounds.max_height;
    } else {
        return false;
    }
    k.velocity.y = 0.0;
    true
}

fn clamp_radial(k: &mut CameraKinematics, bounds: &BoundaryConfig) -> bool {
    match clamp_to_sphere(k.position, bounds.anchor, bounds.max_distance) {
        Some(clamped) => {
            k.position = clamped;
            k.velocity *= bounds.boundary_damping;
            true
        }
        None => false,
    }
}

/// Ease angular speed toward the mouse-driven target and accumulate yaw/pitch.
/// Returns whether pitch hit its limit.
fn update_look(k: &mut CameraKinematics, input: &InputSnapshot, look: &LookConfig) -> bool {
    if !input.pointer_inside {
        k.yaw_speed = 0.0;
        k.pitch_speed = 0.0;
    }

    let target = if input.mouse_active && input.pointer_inside {
        let adjusted = apply_dead_zone_2d(input.mouse_offset, look.dead_zone);
        // Mouse right turns right (negative yaw), mouse up tilts up.
        Vec2::new(-adjusted.x, adjusted.y) * look.sensitivity
    } else {
        Vec2::ZERO
    };

    k.yaw_speed = ease_toward(k.yaw_speed, target.x, look.easing);
    k.pitch_speed = ease_toward(k.pitch_speed, target.y, look.easing);

    k.yaw += k.yaw_speed;
    k.pitch += k.pitch_speed;

    let limit = look.pitch_limit;
    if k.pitch.abs() > limit {
        k.pitch = k.pitch.clamp(-limit, limit);
        k.pitch_speed = 0.0;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraPose;
    use crate::input::InputAggregator;
    use glam::Quat;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn open_bounds() -> CameraConfig {
        CameraConfig::new()
            .with_height_range(-1000.0, 1000.0)
            .with_max_distance(Vec3::ZERO, 1000.0)
    }

    fn idle() -> InputSnapshot {
        InputSnapshot {
            pointer_inside: true,
            ..Default::default()
        }
    }

    fn looking(offset: Vec2) -> InputSnapshot {
        InputSnapshot {
            mouse_offset: offset,
            mouse_active: true,
            pointer_inside: true,
            ..Default::default()
        }
    }

    // ── Translation ──

    #[test]
    fn test_forward_key_sets_exact_velocity() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_move_speed(2.5), &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
        assert_eq!(ctl.kinematics().velocity, Vec3::new(0.0, 0.0, -2.5));
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn test_forward_follows_yaw_and_ignores_pitch() {
        let mut camera = CameraPose::from_yaw_pitch(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.6);
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_move_speed(1.0), &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
        let v = ctl.kinematics().velocity;
        assert!(approx_eq(v.x, -1.0));
        assert!(approx_eq(v.y, 0.0));
        assert!(approx_eq(v.z, 0.0));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_move_speed(1.0), &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW", "KeyD", "Space"]), &mut camera);
        assert!(approx_eq(ctl.kinematics().velocity.length(), 1.0));
    }

    #[test]
    fn test_opposing_keys_fall_back_to_friction() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_move_speed(1.0).with_friction(0.5), &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW", "KeyS"]), &mut camera);
        assert!(approx_eq(ctl.kinematics().velocity.length(), 0.5));
    }

    #[test]
    fn test_all_movement_keys_held_apply_friction_at_any_yaw() {
        for i in 0..200 {
            let yaw = 0.00314 + i as f32 * 0.0314;
            let mut camera = CameraPose::from_yaw_pitch(Vec3::ZERO, yaw, 0.0);
            let mut ctl = FreeCameraController::attached_to(
                open_bounds().with_move_speed(1.0).with_friction(0.5),
                &camera,
            );
            ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
            ctl.step(&InputSnapshot::with_keys(["KeyW", "KeyA", "KeyS", "KeyD"]), &mut camera);
            let speed = ctl.kinematics().velocity.length();
            assert!(approx_eq(speed, 0.5), "yaw={yaw} speed={speed}");
        }
    }

    #[test]
    fn test_friction_decay_scenario() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_move_speed(1.0).with_friction(0.5), &camera);

        ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
        let mut speeds = vec![ctl.kinematics().velocity.length()];
        for _ in 0..3 {
            ctl.step(&idle(), &mut camera);
            speeds.push(ctl.kinematics().velocity.length());
        }
        for (got, want) in speeds.iter().zip([1.0, 0.5, 0.25, 0.125]) {
            assert!(approx_eq(*got, want), "speeds={speeds:?}");
        }
    }

    #[test]
    fn test_decay_is_monotonic_with_split_friction() {
        let mut camera = CameraPose::default();
        let config = open_bounds().with_move_speed(1.0).with_split_friction(0.95, 0.6);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW", "Space"]), &mut camera);

        let mut prev = ctl.kinematics().velocity;
        for _ in 0..30 {
            ctl.step(&idle(), &mut camera);
            let v = ctl.kinematics().velocity;
            let h = Vec2::new(v.x, v.z).length();
            assert!(h < Vec2::new(prev.x, prev.z).length());
            assert!(v.y.abs() < prev.y.abs());
            prev = v;
        }
        // Vertical stops faster than horizontal drifts.
        assert!(prev.y.abs() < Vec2::new(prev.x, prev.z).length());
    }

    #[test]
    fn test_wheel_adds_vertical_velocity_once() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_friction(1.0), &camera);
        let mut input = InputAggregator::new(0, 0.01);
        input.wheel(-100.0);

        ctl.step(&input.snapshot(), &mut camera);
        let first = ctl.kinematics().velocity.y;
        assert!(approx_eq(first, 1.0));
        ctl.step(&input.snapshot(), &mut camera);
        assert!(approx_eq(ctl.kinematics().velocity.y, first));
    }

    // ── Boundaries ──

    #[test]
    fn test_height_clamp_zeroes_vertical_velocity() {
        let mut camera = CameraPose::new(Vec3::new(0.0, 9.5, 0.0), Quat::IDENTITY);
        let config = CameraConfig::new()
            .with_move_speed(1.0)
            .with_height_range(0.0, 10.0)
            .with_max_distance(Vec3::new(0.0, 5.0, 0.0), 100.0);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        ctl.step(&InputSnapshot::with_keys(["Space"]), &mut camera);
        assert_eq!(camera.position.y, 10.0);
        assert_eq!(ctl.kinematics().velocity.y, 0.0);
        assert!(ctl.last_clamp().height);
    }

    #[test]
    fn test_height_clamp_floor() {
        let mut camera = CameraPose::new(Vec3::new(0.0, 0.2, 0.0), Quat::IDENTITY);
        let config = CameraConfig::new().with_move_speed(1.0).with_height_range(0.0, 10.0);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyQ"]), &mut camera);
        assert_eq!(camera.position.y, 0.0);
    }

    #[test]
    fn test_radial_clamp_scenario() {
        let config = CameraConfig::new()
            .with_height_range(-10.0, 10.0)
            .with_max_distance(Vec3::ZERO, 10.0);
        let mut ctl = FreeCameraController::new(config);
        ctl.set_kinematics(CameraKinematics {
            position: Vec3::new(15.0, 0.0, 0.0),
            velocity: Vec3::new(2.0, 0.0, 0.0),
            ..Default::default()
        });
        let mut camera = CameraPose::default();
        ctl.step(&InputSnapshot::default(), &mut camera);
        // velocity decays then is halved by the soft collision
        assert!(approx_eq(camera.position.x, 10.0));
        assert!(approx_eq(camera.position.y, 0.0));
        assert!(approx_eq(camera.position.z, 0.0));
        assert!(ctl.last_clamp().radial);
        assert!(ctl.kinematics().velocity.x < 2.0 * 0.95);
    }

    #[test]
    fn test_bounds_hold_under_sustained_input() {
        let mut camera = CameraPose::from_yaw_pitch(Vec3::new(0.0, 5.0, 0.0), 0.3, 0.0);
        let mut ctl = FreeCameraController::attached_to(CameraConfig::new().with_move_speed(3.0), &camera);
        let bounds = ctl.config().bounds;
        let mut input = InputAggregator::new(0, 0.05);

        for frame in 0..400 {
            let keys: &[&str] = match frame % 4 {
                0 => &["KeyW", "Space"],
                1 => &["KeyD"],
                2 => &["KeyW", "KeyQ"],
                _ => &[],
            };
            input.release_all();
            for key in keys {
                input.key_down(key, Default::default());
            }
            if frame % 7 == 0 {
                input.wheel(-500.0);
            }
            ctl.step(&input.snapshot(), &mut camera);

            let p = camera.position;
            assert!(p.y >= bounds.min_height && p.y <= bounds.max_height, "frame {frame}: {p}");
            assert!((p - bounds.anchor).length() <= bounds.max_distance + 1e-3, "frame {frame}: {p}");
        }
    }

    // ── Look ──

    #[test]
    fn test_inactive_mouse_does_not_turn() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        let input = InputSnapshot {
            mouse_offset: Vec2::new(0.9, 0.9),
            mouse_active: false,
            pointer_inside: true,
            ..Default::default()
        };
        for _ in 0..20 {
            ctl.step(&input, &mut camera);
        }
        assert_eq!(ctl.kinematics().yaw, 0.0);
        assert_eq!(ctl.kinematics().pitch, 0.0);
        assert_eq!(camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_startup_delay_gates_look() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        let mut input = InputAggregator::new(1000, 0.0);
        input.pointer_moved(Vec2::ZERO);
        input.pointer_moved(Vec2::new(0.7, -0.3));
        for _ in 0..10 {
            ctl.step(&input.snapshot(), &mut camera);
        }
        assert_eq!(ctl.kinematics().yaw, 0.0);

        input.activation_elapsed();
        let mut prev = ctl.kinematics().yaw;
        for _ in 0..10 {
            ctl.step(&input.snapshot(), &mut camera);
            assert!(ctl.kinematics().yaw < prev);
            prev = ctl.kinematics().yaw;
        }
    }

    #[test]
    fn test_mouse_left_turns_left() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        for _ in 0..5 {
            ctl.step(&looking(Vec2::new(-0.6, 0.0)), &mut camera);
        }
        assert!(ctl.kinematics().yaw > 0.0);
    }

    #[test]
    fn test_mouse_up_tilts_up() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        for _ in 0..5 {
            ctl.step(&looking(Vec2::new(0.0, 0.6)), &mut camera);
        }
        assert!(ctl.kinematics().pitch > 0.0);
        assert!(camera.forward().y > 0.0);
    }

    #[test]
    fn test_dead_zone_produces_no_speed() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds().with_dead_zone(0.2), &camera);
        for _ in 0..10 {
            ctl.step(&looking(Vec2::new(0.15, -0.19)), &mut camera);
        }
        let k = ctl.kinematics();
        assert_eq!(k.yaw_speed, 0.0);
        assert_eq!(k.pitch_speed, 0.0);
        assert_eq!(k.yaw, 0.0);
    }

    #[test]
    fn test_easing_approaches_target_smoothly() {
        let mut camera = CameraPose::default();
        let config = open_bounds().with_dead_zone(0.0).with_sensitivity(0.1).with_easing(0.5);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        ctl.step(&looking(Vec2::new(1.0, 0.0)), &mut camera);
        assert!(approx_eq(ctl.kinematics().yaw_speed, -0.05));
        ctl.step(&looking(Vec2::new(1.0, 0.0)), &mut camera);
        assert!(approx_eq(ctl.kinematics().yaw_speed, -0.075));
        assert!(approx_eq(ctl.kinematics().yaw, -0.125));
    }

    #[test]
    fn test_yaw_accumulates_past_full_turn() {
        let mut camera = CameraPose::default();
        let config = open_bounds().with_dead_zone(0.0).with_sensitivity(0.5).with_easing(1.0);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        for _ in 0..40 {
            ctl.step(&looking(Vec2::new(-1.0, 0.0)), &mut camera);
        }
        assert!(approx_eq(ctl.kinematics().yaw, 20.0));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = CameraPose::default();
        let config = open_bounds().with_dead_zone(0.0).with_sensitivity(0.5).with_easing(1.0);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        let limit = ctl.config().look.pitch_limit;
        for _ in 0..50 {
            ctl.step(&looking(Vec2::new(0.0, 1.0)), &mut camera);
            assert!(ctl.kinematics().pitch.abs() <= limit);
        }
        assert_eq!(ctl.kinematics().pitch, limit);
        assert!(ctl.last_clamp().pitch);

        for _ in 0..50 {
            ctl.step(&looking(Vec2::new(0.0, -1.0)), &mut camera);
            assert!(ctl.kinematics().pitch.abs() <= limit);
        }
        assert_eq!(ctl.kinematics().pitch, -limit);
    }

    #[test]
    fn test_pointer_leave_drops_residual_speed() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        let mut input = InputAggregator::new(0, 0.0);
        input.pointer_moved(Vec2::ZERO);
        input.pointer_moved(Vec2::new(0.9, 0.5));
        for _ in 0..10 {
            ctl.step(&input.snapshot(), &mut camera);
        }
        assert!(ctl.kinematics().yaw_speed != 0.0);

        input.pointer_left();
        let yaw_before = ctl.kinematics().yaw;
        let pitch_before = ctl.kinematics().pitch;
        ctl.step(&input.snapshot(), &mut camera);
        assert_eq!(ctl.kinematics().yaw, yaw_before);
        assert_eq!(ctl.kinematics().pitch, pitch_before);
    }

    #[test]
    fn test_orientation_written_as_yaw_then_pitch() {
        let mut camera = CameraPose::default();
        let config = open_bounds().with_dead_zone(0.0).with_sensitivity(0.2).with_easing(1.0);
        let mut ctl = FreeCameraController::attached_to(config, &camera);
        ctl.step(&looking(Vec2::new(-1.0, 1.0)), &mut camera);
        let expected = orientation_from_yaw_pitch(0.2, 0.2);
        assert!(camera.orientation.abs_diff_eq(expected, EPSILON));
    }

    // ── Sync / reset ──

    #[test]
    fn test_sync_with_camera() {
        let camera = CameraPose::from_yaw_pitch(Vec3::new(1.0, 2.0, 3.0), 0.8, -0.3);
        let ctl = FreeCameraController::attached_to(CameraConfig::default(), &camera);
        let k = ctl.kinematics();
        assert_eq!(k.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(approx_eq(k.yaw, 0.8));
        assert!(approx_eq(k.pitch, -0.3));
    }

    #[test]
    fn test_reset_stops_motion() {
        let mut camera = CameraPose::default();
        let mut ctl = FreeCameraController::attached_to(open_bounds(), &camera);
        ctl.step(&InputSnapshot::with_keys(["KeyW"]), &mut camera);
        ctl.reset();
        assert_eq!(ctl.kinematics().velocity, Vec3::ZERO);
        assert_eq!(ctl.kinematics().position, camera.position);
    }
}
