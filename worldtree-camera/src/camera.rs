use glam::{Quat, Vec3};

/// The live camera the controller drives.
///
/// Implemented by whatever owns the rendered camera; [`CameraPose`] is the
/// plain in-memory version.
pub trait CameraRig {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn orientation(&self) -> Quat;
    fn set_orientation(&mut self, orientation: Quat);

    /// World-space view direction (-Z in camera space).
    fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }
}

/// Camera position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` facing `yaw`/`pitch` (turn about world up, then tilt).
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self::new(position, orientation_from_yaw_pitch(yaw, pitch))
    }

    /// Pose at `eye` looking toward `target` with world up.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let dir = (target - eye).normalize_or_zero();
        if dir == Vec3::ZERO {
            return Self::new(eye, Quat::IDENTITY);
        }
        let (yaw, pitch) = yaw_pitch_from_forward(dir);
        Self::from_yaw_pitch(eye, yaw, pitch)
    }

    pub fn to_raw(&self) -> PoseRaw {
        PoseRaw {
            position: self.position.to_array(),
            _pad: 0.0,
            orientation: self.orientation.to_array(),
        }
    }
}

impl CameraRig for CameraPose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }
}

/// Yaw about world up, then pitch about the turned local right axis.
pub fn orientation_from_yaw_pitch(yaw: f32, pitch: f32) -> Quat {
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
}

/// Inverse of [`orientation_from_yaw_pitch`] for a unit forward vector.
pub fn yaw_pitch_from_forward(forward: Vec3) -> (f32, f32) {
    let yaw = (-forward.x).atan2(-forward.z);
    let pitch = forward.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

/// Flat pose layout handed to renderers and JavaScript: xyz, pad, quaternion xyzw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PoseRaw {
    pub position: [f32; 3],
    pub _pad: f32,
    pub orientation: [f32; 4],
}

impl PoseRaw {
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}
