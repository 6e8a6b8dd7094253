//! World Tree free camera.
//!
//! Platform-agnostic core shared by the wasm web runtime and the native CLI:
//! an input aggregator turning device events into per-frame snapshots, and a
//! frame-stepped controller that moves and turns the camera.

pub mod activation;
pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod keys;
pub mod math;

pub use activation::{ActivationDeadline, ActivationRequest, MouseActivation};
pub use camera::{CameraPose, CameraRig, PoseRaw};
pub use config::{BoundaryConfig, CameraConfig, LookConfig, MotionConfig};
pub use controller::{CameraKinematics, ClampReport, FreeCameraController};
pub use input::{InputAggregator, InputSnapshot, InputState, KeyDisposition, Viewport};
pub use keys::{KeyBindings, Modifiers, MoveAction};
