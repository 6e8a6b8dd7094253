use std::collections::HashMap;

use chrono::{DateTime, Local};
use glam::Vec2;
use ratatui::layout::Rect;
use worldtree_camera::{
    ActivationDeadline, ActivationRequest, CameraConfig, CameraPose, FreeCameraController,
    InputAggregator, InputSnapshot, Modifiers, Viewport,
};

/// How long a key stays held after its last press or repeat when the
/// terminal cannot report key releases.
pub const KEY_LATCH_MS: f64 = 500.0;

// ─── Log Buffer ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub level: log::Level,
    pub text: String,
}

pub struct LogBuffer {
    pub lines: Vec<LogLine>,
    pub scroll_offset: usize,
    pub auto_scroll: bool,
    max_lines: usize,
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            scroll_offset: 0,
            auto_scroll: true,
            max_lines,
        }
    }

    pub fn push(&mut self, level: log::Level, text: String) {
        if self.lines.len() >= self.max_lines {
            self.lines.remove(0);
            self.scroll_offset = self.scroll_offset.saturating_sub(1);
        }
        self.lines.push(LogLine {
            timestamp: chrono::Local::now(),
            level,
            text,
        });
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.lines.len().saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.lines.len().saturating_sub(1));
        if self.scroll_offset >= self.lines.len().saturating_sub(1) {
            self.auto_scroll = true;
        }
    }
}

// ─── Preview State ───────────────────────────────────────────────────

/// Everything the terminal preview owns: the controller, its camera, the
/// input aggregator and the polled activation deadline.
pub struct PreviewState {
    pub controller: FreeCameraController,
    pub camera: CameraPose,
    pub input: InputAggregator,
    pub deadline: ActivationDeadline,
    pub log: LogBuffer,
    /// Screen area of the map, recorded at render time for pointer mapping.
    pub map_area: Option<Rect>,
    pub frame_count: u64,
    pub show_help: bool,
    pub should_quit: bool,
    /// Release deadlines for held keys; `None` when the terminal reports releases.
    latches: Option<HashMap<String, f64>>,
    start: CameraPose,
    pointer_inside: bool,
    last_snapshot: InputSnapshot,
}

impl PreviewState {
    pub fn new(config: CameraConfig, reports_key_release: bool) -> Self {
        let anchor = config.bounds.anchor;
        let radius = config.bounds.max_distance;
        let eye = anchor + glam::Vec3::new(0.0, 0.0, radius * 0.5);
        let camera = CameraPose::looking_at(eye, anchor);
        let input = InputAggregator::from_config(&config);
        Self {
            controller: FreeCameraController::attached_to(config, &camera),
            camera,
            input,
            deadline: ActivationDeadline::new(),
            log: LogBuffer::new(2000),
            map_area: None,
            frame_count: 0,
            show_help: false,
            should_quit: false,
            latches: (!reports_key_release).then(HashMap::new),
            start: camera,
            pointer_inside: false,
            last_snapshot: InputSnapshot::default(),
        }
    }

    // ── Keys ──

    pub fn key_pressed(&mut self, code: &str, modifiers: Modifiers, now_ms: f64) {
        let disposition = self.input.key_down(code, modifiers);
        if disposition.recorded {
            if let Some(latches) = &mut self.latches {
                latches.insert(code.to_string(), now_ms + KEY_LATCH_MS);
            }
        }
    }

    pub fn key_released(&mut self, code: &str) {
        self.input.key_up(code);
        if let Some(latches) = &mut self.latches {
            latches.remove(code);
        }
    }

    fn expire_latches(&mut self, now_ms: f64) {
        let Some(latches) = &mut self.latches else {
            return;
        };
        let expired: Vec<String> = latches
            .iter()
            .filter(|(_, until)| **until <= now_ms)
            .map(|(code, _)| code.clone())
            .collect();
        for code in expired {
            latches.remove(&code);
            self.input.key_up(&code);
        }
    }

    // ── Pointer ──

    /// Terminal mouse at `(column, row)`. Positions outside the map count as
    /// the pointer leaving.
    pub fn mouse_at(&mut self, column: u16, row: u16, now_ms: f64) {
        let Some(area) = self.map_area else {
            return;
        };
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            self.mouse_left();
            return;
        }

        let viewport = Viewport::new(f32::from(area.width), f32::from(area.height));
        let ndc: Vec2 = viewport.to_ndc(
            f32::from(column - area.x) + 0.5,
            f32::from(row - area.y) + 0.5,
        );
        let request = if self.pointer_inside || self.input.state().origin.is_none() {
            self.input.pointer_moved(ndc)
        } else {
            self.input.pointer_entered(ndc)
        };
        self.pointer_inside = true;
        if let ActivationRequest::StartTimer { delay_ms } = request {
            self.deadline.arm(now_ms, delay_ms);
        }
    }

    pub fn mouse_left(&mut self) {
        if self.pointer_inside {
            self.pointer_inside = false;
            self.input.pointer_left();
        }
    }

    pub fn scroll(&mut self, delta_y: f32) {
        self.input.wheel(delta_y);
    }

    // ── Frame ──

    /// Advance one frame at `now_ms` on the preview clock.
    pub fn tick(&mut self, now_ms: f64) {
        self.expire_latches(now_ms);
        if self.deadline.poll(now_ms) {
            self.input.activation_elapsed();
        }
        self.last_snapshot = self.input.snapshot();
        self.controller.step(&self.last_snapshot, &mut self.camera);
        self.frame_count += 1;
    }

    /// Put the camera back at its starting pose, at rest.
    pub fn reset_camera(&mut self) {
        self.camera = self.start;
        self.controller.sync_with_camera(&self.camera);
        self.controller.reset();
        log::info!("camera reset");
    }

    pub fn last_snapshot(&self) -> &InputSnapshot {
        &self.last_snapshot
    }

    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }
}
