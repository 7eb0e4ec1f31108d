//! Input routing: one selected mode per category writing into the parameter store.
//!
//! ```text
//! CursorMoved / MouseButton / MouseWheel / deviceorientation / RPC "tilt"
//!   └─> input systems (normalize to [0,1]², wheel lines, raw angles)
//!       └─> InteractionRouter ──> selected mode ──> ParameterStore::set_many
//!                          └─> EffectScheduler (one tick per frame)
//! ```

/// Browser orientation listener feeding `TiltReading` events.
pub mod device_orientation;

/// Decaying effect state machines and their shared scheduler.
pub mod effects;

/// Thin layer turning Bevy input events into router calls.
pub mod input;

pub mod modes;

/// Mode selection and dispatch.
pub mod router;

/// Clamping and smoothing of device orientation.
pub mod tilt;

use crate::engine::core::app_state::AppState;
use bevy::prelude::*;
use device_orientation::{OrientationQueue, drain_orientation_queue};
use input::{
    TiltReading, click_input_system, effect_tick_system, pointer_input_system,
    scroll_input_system, tilt_input_system,
};

pub use router::InteractionRouter;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionRouter>()
            .init_resource::<OrientationQueue>()
            .add_event::<TiltReading>()
            .add_systems(
                Update,
                (
                    drain_orientation_queue,
                    pointer_input_system,
                    click_input_system,
                    scroll_input_system,
                    tilt_input_system,
                    effect_tick_system,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, device_orientation::setup_orientation_listener);
    }
}
