//! Scripted input sessions for headless replays.
//!
//! ```toml
//! fps = 60
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [[segment]]
//! frames = 30
//! keys = ["KeyW"]
//!
//! [[segment]]
//! frames = 120
//! pointer = [900.0, 360.0]
//! wheel = -240.0
//!
//! [[segment]]
//! frames = 10
//! leave = true
//! ```
//!
//! Each segment's events are delivered once, before its first frame; held
//! keys persist for the whole segment.

use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use worldtree_camera::{
    ActivationDeadline, ActivationRequest, CameraConfig, CameraPose, FreeCameraController,
    InputAggregator, Modifiers, Viewport,
};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScriptViewport {
    pub width: f32,
    pub height: f32,
}

impl Default for ScriptViewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub frames: u32,
    /// Keys held for the whole segment. `"Ctrl+KeyW"` style entries are sent as chords.
    pub keys: Vec<String>,
    /// Pointer position in pixels.
    pub pointer: Option<[f32; 2]>,
    /// Wheel `deltaY` in pixels, delivered once.
    pub wheel: f32,
    /// Pointer leaves the viewport.
    pub leave: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default = "default_fps")]
    pub fps: f32,
    #[serde(default)]
    pub viewport: ScriptViewport,
    /// Camera start position; defaults to the anchor.
    #[serde(default)]
    pub start: Option<Vec3>,
    #[serde(default, rename = "segment")]
    pub segments: Vec<Segment>,
}

fn default_fps() -> f32 {
    60.0
}

impl Script {
    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        let script: Script = toml::from_str(source)?;
        if script.fps <= 0.0 {
            anyhow::bail!("fps must be positive, got {}", script.fps);
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.frames)).sum()
    }
}

/// Camera state after one replayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub mouse_active: bool,
}

/// Drives the controller from a script, with a polled activation deadline
/// standing in for the browser timer.
pub struct Replay {
    controller: FreeCameraController,
    camera: CameraPose,
    input: InputAggregator,
    deadline: ActivationDeadline,
    viewport: Viewport,
    frame_ms: f64,
    frame: u64,
    time_ms: f64,
    pointer_inside: bool,
}

impl Replay {
    pub fn new(config: CameraConfig, script: &Script) -> Self {
        let start = script.start.unwrap_or(config.bounds.anchor);
        let camera = CameraPose::new(start, Default::default());
        let input = InputAggregator::from_config(&config);
        Self {
            controller: FreeCameraController::attached_to(config, &camera),
            camera,
            input,
            deadline: ActivationDeadline::new(),
            viewport: Viewport::new(script.viewport.width, script.viewport.height),
            frame_ms: 1000.0 / f64::from(script.fps),
            frame: 0,
            time_ms: 0.0,
            pointer_inside: false,
        }
    }

    /// Deliver a segment's events.
    pub fn begin_segment(&mut self, segment: &Segment) {
        self.input.release_all();
        for key in &segment.keys {
            let (code, modifiers) = parse_key(key);
            self.input.key_down(code, modifiers);
        }

        if segment.leave {
            self.input.pointer_left();
            self.pointer_inside = false;
        }

        if let Some([x, y]) = segment.pointer {
            let ndc = self.viewport.to_ndc(x, y);
            let request = if self.pointer_inside || self.input.state().origin.is_none() {
                self.input.pointer_moved(ndc)
            } else {
                self.input.pointer_entered(ndc)
            };
            self.pointer_inside = true;
            if let ActivationRequest::StartTimer { delay_ms } = request {
                self.deadline.arm(self.time_ms, delay_ms);
            }
        }

        if segment.wheel != 0.0 {
            self.input.wheel(segment.wheel);
        }
    }

    /// Advance one frame.
    pub fn step(&mut self) -> FrameRecord {
        if self.deadline.poll(self.time_ms) {
            self.input.activation_elapsed();
        }
        let snapshot = self.input.snapshot();
        self.controller.step(&snapshot, &mut self.camera);

        let k = self.controller.kinematics();
        let record = FrameRecord {
            frame: self.frame,
            time_ms: self.time_ms,
            position: k.position,
            velocity: k.velocity,
            yaw: k.yaw,
            pitch: k.pitch,
            mouse_active: snapshot.mouse_active,
        };
        self.frame += 1;
        self.time_ms += self.frame_ms;
        record
    }

    /// Replay the whole script, calling `on_frame` for every frame.
    pub fn run(&mut self, script: &Script, mut on_frame: impl FnMut(&FrameRecord)) {
        for segment in &script.segments {
            self.begin_segment(segment);
            for _ in 0..segment.frames {
                let record = self.step();
                on_frame(&record);
            }
        }
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }
}

/// Split `"Ctrl+Shift+KeyW"` into the code and its modifiers.
fn parse_key(entry: &str) -> (&str, Modifiers) {
    let mut modifiers = Modifiers::default();
    let mut parts = entry.split('+').peekable();
    let mut code = entry;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            code = part;
            break;
        }
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "alt" => modifiers.alt = true,
            "meta" | "cmd" | "super" => modifiers.meta = true,
            "shift" => modifiers.shift = true,
            _ => {}
        }
    }
    (code, modifiers)
}
