//! DOM event wiring for the input aggregator.
//!
//! Every listener and the activation timer live in guards owned by
//! [`InputBinding`]; dropping the binding removes them all.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, PointerEvent,
    WheelEvent,
};

use worldtree_camera::{ActivationRequest, InputAggregator, Modifiers, Viewport};

use crate::events::{is_look_pointer, wheel_delta_pixels};
use crate::timer::Timeout;

type SharedInput = Rc<RefCell<InputAggregator>>;
type SharedTimer = Rc<RefCell<Option<Timeout>>>;

/// A registered listener. Removed from its target on drop.
struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Listeners plus the pending activation timer for one canvas.
pub struct InputBinding {
    listeners: Vec<EventListener>,
    timer: SharedTimer,
}

impl InputBinding {
    /// Register keyboard listeners on the window and pointer/wheel listeners on the canvas.
    pub fn attach(canvas: &HtmlCanvasElement, input: SharedInput) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let window: &EventTarget = window.as_ref();
        let canvas_target: &EventTarget = canvas.as_ref();
        let timer: SharedTimer = Rc::new(RefCell::new(None));

        let mut listeners = Vec::with_capacity(8);

        // keydown
        {
            let input = input.clone();
            listeners.push(EventListener::new(window, "keydown", false, move |evt| {
                let Some(evt) = evt.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let modifiers = Modifiers {
                    ctrl: evt.ctrl_key(),
                    alt: evt.alt_key(),
                    meta: evt.meta_key(),
                    shift: evt.shift_key(),
                };
                let disposition = input.borrow_mut().key_down(&evt.code(), modifiers);
                if disposition.suppress_default {
                    evt.prevent_default();
                }
            })?);
        }

        // keyup
        {
            let input = input.clone();
            listeners.push(EventListener::new(window, "keyup", true, move |evt| {
                if let Some(evt) = evt.dyn_ref::<KeyboardEvent>() {
                    input.borrow_mut().key_up(&evt.code());
                }
            })?);
        }

        // blur: the matching keyup never arrives
        {
            let input = input.clone();
            listeners.push(EventListener::new(window, "blur", true, move |_| {
                input.borrow_mut().release_all();
            })?);
        }

        // pointermove
        {
            let input = input.clone();
            let timer = timer.clone();
            let canvas = canvas.clone();
            listeners.push(EventListener::new(canvas_target, "pointermove", true, move |evt| {
                let Some(evt) = evt.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !is_look_pointer(&evt.pointer_type()) {
                    return;
                }
                let ndc = pointer_ndc(&canvas, evt);
                let request = input.borrow_mut().pointer_moved(ndc);
                schedule_activation(request, &input, &timer);
            })?);
        }

        // pointerenter
        {
            let input = input.clone();
            let timer = timer.clone();
            let canvas = canvas.clone();
            listeners.push(EventListener::new(canvas_target, "pointerenter", true, move |evt| {
                let Some(evt) = evt.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !is_look_pointer(&evt.pointer_type()) {
                    return;
                }
                let ndc = pointer_ndc(&canvas, evt);
                let request = input.borrow_mut().pointer_entered(ndc);
                schedule_activation(request, &input, &timer);
            })?);
        }

        // pointerleave
        {
            let input = input.clone();
            listeners.push(EventListener::new(canvas_target, "pointerleave", true, move |_| {
                input.borrow_mut().pointer_left();
            })?);
        }

        // wheel: non-passive so the page does not scroll
        {
            let input = input.clone();
            let canvas = canvas.clone();
            listeners.push(EventListener::new(canvas_target, "wheel", false, move |evt| {
                let Some(evt) = evt.dyn_ref::<WheelEvent>() else {
                    return;
                };
                evt.prevent_default();
                let page_height = canvas.client_height() as f32;
                let delta = wheel_delta_pixels(evt.delta_y(), evt.delta_mode(), page_height);
                input.borrow_mut().wheel(delta);
            })?);
        }

        log::info!("Input listeners attached ({} listeners)", listeners.len());
        Ok(Self { listeners, timer })
    }

    /// Remove every listener and cancel a pending activation timer.
    pub fn detach(&mut self) {
        if self.listeners.is_empty() && self.timer.borrow().is_none() {
            return;
        }
        self.listeners.clear();
        self.timer.borrow_mut().take();
        log::info!("Input listeners detached");
    }
}

impl Drop for InputBinding {
    fn drop(&mut self) {
        self.detach();
    }
}

fn pointer_ndc(canvas: &HtmlCanvasElement, evt: &PointerEvent) -> Vec2 {
    let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);
    viewport.to_ndc(evt.offset_x() as f32, evt.offset_y() as f32)
}

fn schedule_activation(request: ActivationRequest, input: &SharedInput, timer: &SharedTimer) {
    let ActivationRequest::StartTimer { delay_ms } = request else {
        return;
    };
    let input = input.clone();
    match Timeout::start(delay_ms, move || input.borrow_mut().activation_elapsed()) {
        Ok(timeout) => *timer.borrow_mut() = Some(timeout),
        Err(err) => log::error!("Failed to start activation timer: {err:?}"),
    }
}
