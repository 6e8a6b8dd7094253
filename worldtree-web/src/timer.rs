use wasm_bindgen::prelude::*;

/// One-shot `setTimeout` owned by this guard. Dropping it clears the timeout,
/// so the callback can never run after its owner is gone.
pub struct Timeout {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn start(delay_ms: u32, callback: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let callback = Closure::<dyn FnMut()>::new(callback);
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        )?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}
