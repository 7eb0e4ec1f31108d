use crate::engine::catalog::GeometryCatalog;
use crate::engine::parameters::{Channel, ParameterStore};
use bevy::prelude::*;
use polytope_geometry::GeometryIndexCodec;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::coordinator::EngineIdentity;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::parameters::SessionRng;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::engine_switch::{EngineSwitchEvent, SwitchSource};

/// Moves the geometry channel by `delta`, wrapping at both ends.
pub fn step_geometry(store: &mut ParameterStore, codec: &GeometryIndexCodec, delta: i64) -> bool {
    let current = store.value(Channel::Geometry) as i64;
    let next = codec.normalize(current + delta);
    store.set(Channel::Geometry, next.value() as f32)
}

/// Resets to the biased defaults of the geometry currently shown.
pub fn reset_for_current_geometry(store: &mut ParameterStore, catalog: &GeometryCatalog) -> bool {
    let bias = catalog.bias_for_index(store.snapshot().geometry_index());
    store.reset_to_defaults(bias)
}

/// Native shortcuts: 1/2/3 engines, R randomize, Backspace reset, arrows step geometry.
/// Browser builds are driven over RPC instead.
pub fn keyboard_shortcut_system(
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
    #[cfg(not(target_arch = "wasm32"))] mut store: ResMut<ParameterStore>,
    #[cfg(not(target_arch = "wasm32"))] mut rng: ResMut<SessionRng>,
    #[cfg(not(target_arch = "wasm32"))] catalog: Res<GeometryCatalog>,
    #[cfg(not(target_arch = "wasm32"))] mut switches: EventWriter<EngineSwitchEvent>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let engines = [
            (KeyCode::Digit1, EngineIdentity::Volumetric),
            (KeyCode::Digit2, EngineIdentity::Faceted),
            (KeyCode::Digit3, EngineIdentity::Layered),
        ];
        for (key, identity) in engines {
            if keyboard.just_pressed(key) {
                switches.write(EngineSwitchEvent {
                    name: identity.name().to_string(),
                    source: SwitchSource::Keyboard,
                });
            }
        }

        if keyboard.just_pressed(KeyCode::KeyR) {
            store.randomize(&mut rng.0);
            println!("Parameters randomized");
        }

        if keyboard.just_pressed(KeyCode::Backspace) {
            reset_for_current_geometry(&mut store, &catalog);
            println!("Parameters reset");
        }

        let codec = catalog.codec();
        if keyboard.just_pressed(KeyCode::ArrowRight) || keyboard.just_pressed(KeyCode::ArrowUp) {
            step_geometry(&mut store, codec, 1);
        }
        if keyboard.just_pressed(KeyCode::ArrowLeft) || keyboard.just_pressed(KeyCode::ArrowDown) {
            step_geometry(&mut store, codec, -1);
        }
    }
}
