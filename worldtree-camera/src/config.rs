//! Construction-time tuning for the free camera.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [motion]
//! move_speed = 0.3
//!
//! [bounds]
//! max_distance = 120.0
//! anchor = [0.0, 8.0, 0.0]
//! ```
//!
//! Values are not validated. A `max_height` below `min_height` or a negative
//! speed produces odd motion, never a panic.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::keys::KeyBindings;

/// Translation tuning. Speeds are world units per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub move_speed: f32,
    /// Per-frame velocity factor on X/Z while no movement key is held.
    pub friction_horizontal: f32,
    /// Per-frame velocity factor on Y while no movement key is held.
    pub friction_vertical: f32,
    /// Vertical velocity added per wheel delta unit (scroll up ascends).
    pub wheel_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.15,
            friction_horizontal: 0.95,
            friction_vertical: 0.85,
            wheel_scale: 0.002,
        }
    }
}

/// Mouse-look tuning. Offsets are in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookConfig {
    /// Radians per frame per unit of (dead-zone adjusted) offset.
    pub sensitivity: f32,
    pub dead_zone: f32,
    /// Fraction of the gap between current and target angular speed closed each frame.
    pub easing: f32,
    /// Symmetric pitch limit in radians.
    pub pitch_limit: f32,
    /// Delay between the first pointer movement and mouse look becoming active.
    pub startup_delay_ms: u32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            sensitivity: 0.03,
            dead_zone: 0.1,
            easing: 0.08,
            pitch_limit: 1.2,
            startup_delay_ms: 1500,
        }
    }
}

/// Spatial limits for the camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub min_height: f32,
    pub max_height: f32,
    pub max_distance: f32,
    /// Center of the radial clamp. Expected to lie inside the height band.
    pub anchor: Vec3,
    /// Velocity factor applied when the radial clamp pushes the camera back.
    pub boundary_damping: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            min_height: 0.5,
            max_height: 60.0,
            max_distance: 80.0,
            anchor: Vec3::new(0.0, 5.0, 0.0),
            boundary_damping: 0.5,
        }
    }
}

/// Complete camera configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub motion: MotionConfig,
    pub look: LookConfig,
    pub bounds: BoundaryConfig,
    pub keys: KeyBindings,
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement speed (units per frame).
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.motion.move_speed = speed;
        self
    }

    /// Use the same friction factor on every axis.
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.motion.friction_horizontal = friction;
        self.motion.friction_vertical = friction;
        self
    }

    /// Set separate horizontal and vertical friction factors.
    pub fn with_split_friction(mut self, horizontal: f32, vertical: f32) -> Self {
        self.motion.friction_horizontal = horizontal;
        self.motion.friction_vertical = vertical;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.look.sensitivity = sensitivity;
        self
    }

    pub fn with_dead_zone(mut self, dead_zone: f32) -> Self {
        self.look.dead_zone = dead_zone;
        self
    }

    pub fn with_easing(mut self, easing: f32) -> Self {
        self.look.easing = easing;
        self
    }

    pub fn with_startup_delay_ms(mut self, delay_ms: u32) -> Self {
        self.look.startup_delay_ms = delay_ms;
        self
    }

    /// Set the allowed height band.
    pub fn with_height_range(mut self, min: f32, max: f32) -> Self {
        self.bounds.min_height = min;
        self.bounds.max_height = max;
        self
    }

    /// Set the radial clamp around `anchor`.
    pub fn with_max_distance(mut self, anchor: Vec3, max_distance: f32) -> Self {
        self.bounds.anchor = anchor;
        self.bounds.max_distance = max_distance;
        self
    }
}
