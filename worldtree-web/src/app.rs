use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use worldtree_camera::{CameraConfig, CameraPose, FreeCameraController, InputAggregator};

use crate::listeners::InputBinding;
use crate::loading::LoadingState;

/// Where the camera starts before the page syncs it to its own camera.
const START_EYE: Vec3 = Vec3::new(0.0, 6.0, 30.0);

/// Main application state for the WASM runtime.
#[wasm_bindgen]
pub struct App {
    controller: FreeCameraController,
    camera: CameraPose,
    input: Rc<RefCell<InputAggregator>>,
    binding: Option<InputBinding>,
    loading: LoadingState,
    frame_count: u64,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl App {
    /// Create a new App bound to the canvas, with an optional JSON camera config.
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<App, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Element is not a canvas")?;

        let config = match config_json {
            Some(json) => serde_json::from_str::<CameraConfig>(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid camera config: {e}")))?,
            None => CameraConfig::default(),
        };

        log::info!(
            "Camera config: speed {}, look delay {} ms, bounds y {}..{}, radius {}",
            config.motion.move_speed,
            config.look.startup_delay_ms,
            config.bounds.min_height,
            config.bounds.max_height,
            config.bounds.max_distance,
        );

        let camera = CameraPose::looking_at(START_EYE, config.bounds.anchor);
        let input = Rc::new(RefCell::new(InputAggregator::from_config(&config)));
        let binding = InputBinding::attach(&canvas, input.clone())?;
        let controller = FreeCameraController::attached_to(config, &camera);

        Ok(App {
            controller,
            camera,
            input,
            binding: Some(binding),
            loading: LoadingState::default(),
            frame_count: 0,
            canvas,
        })
    }

    /// Run one simulation step. Called from requestAnimationFrame.
    pub fn frame(&mut self, _time: f64) {
        if self.binding.is_none() {
            return;
        }
        let snapshot = self.input.borrow_mut().snapshot();
        self.controller.step(&snapshot, &mut self.camera);
        self.frame_count += 1;
    }

    /// Adopt the page camera's pose (position xyz, quaternion xyzw).
    pub fn sync_camera(&mut self, px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
        self.camera = CameraPose::new(
            Vec3::new(px, py, pz),
            Quat::from_xyzw(qx, qy, qz, qw).normalize(),
        );
        self.controller.sync_with_camera(&self.camera);
        self.controller.reset();
    }

    /// Position xyz, padding, quaternion xyzw.
    pub fn pose(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.camera.to_raw().as_floats())
    }

    pub fn position(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.camera.position.to_array()[..])
    }

    pub fn yaw(&self) -> f32 {
        self.controller.kinematics().yaw
    }

    pub fn pitch(&self) -> f32 {
        self.controller.kinematics().pitch
    }

    pub fn mouse_active(&self) -> bool {
        self.input.borrow().activation().is_active()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ── Loading state ──

    pub fn report_asset_progress(&mut self, loaded: u32, total: u32) {
        self.loading.progress(loaded, total);
        if self.loading.is_ready() {
            log::info!("Scene assets ready ({total})");
        }
    }

    pub fn report_asset_error(&mut self, message: String) {
        log::error!("Asset load failed: {message}");
        self.loading.fail(message);
    }

    pub fn loading_progress(&self) -> f32 {
        self.loading.fraction()
    }

    pub fn loading_status(&self) -> String {
        self.loading.label()
    }

    pub fn loading_error(&self) -> Option<String> {
        self.loading.error().map(str::to_string)
    }

    // ── Teardown ──

    /// Remove all listeners and cancel the activation timer. Frames become no-ops.
    pub fn destroy(&mut self) {
        if let Some(mut binding) = self.binding.take() {
            binding.detach();
        }
        self.input.borrow_mut().release_all();
    }

    /// Resize the canvas backing store. Pointer mapping reads the CSS size,
    /// so look input is unaffected.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width.max(1));
        self.canvas.set_height(height.max(1));
        log::debug!("Canvas resized to {width}x{height}");
    }

    /// Get the canvas width.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Get the canvas height.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}
