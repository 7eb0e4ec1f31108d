use super::input::TiltReading;
use bevy::prelude::*;
use std::sync::{Arc, Mutex};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use web_sys::{DeviceOrientationEvent, window};

/// Readings captured by the browser listener, drained once per frame.
#[derive(Resource, Default, Clone)]
pub struct OrientationQueue(Arc<Mutex<Vec<TiltReading>>>);

impl OrientationQueue {
    pub fn push(&self, reading: TiltReading) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(reading);
        }
    }

    fn take(&self) -> Vec<TiltReading> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn setup_orientation_listener(queue: Res<OrientationQueue>) {
    let queue = queue.clone();
    let closure = Closure::wrap(Box::new(move |event: DeviceOrientationEvent| {
        // Sensors without a reading report null; those events are skipped.
        if let (Some(alpha), Some(beta), Some(gamma)) = (event.alpha(), event.beta(), event.gamma()) {
            queue.push(TiltReading {
                alpha: alpha as f32,
                beta: beta as f32,
                gamma: gamma as f32,
            });
        }
    }) as Box<dyn FnMut(DeviceOrientationEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("deviceorientation", closure.as_ref().unchecked_ref())
            {
                warn!("Device orientation listener not registered: {:?}", e);
            }
        }
        None => warn!("Window object not available for device orientation"),
    }

    closure.forget();
}

pub fn drain_orientation_queue(queue: Res<OrientationQueue>, mut readings: EventWriter<TiltReading>) {
    for reading in queue.take() {
        readings.write(reading);
    }
}
