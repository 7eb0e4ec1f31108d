use crate::engine::coordinator::{EngineCoordinator, EngineIdentity};
use crate::engine::parameters::ParameterStore;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

/// Where a switch request came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchSource {
    Rpc,
    Keyboard,
    Restore,
}

/// Request to activate an engine by name. Parsed by the coordinator so unknown
/// names surface as `EngineError::UnknownEngine`.
#[derive(Event, Debug, Clone)]
pub struct EngineSwitchEvent {
    pub name: String,
    pub source: SwitchSource,
}

pub fn handle_engine_switch_events(
    mut events: EventReader<EngineSwitchEvent>,
    mut coordinator: ResMut<EngineCoordinator>,
    store: Res<ParameterStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        let snapshot = store.snapshot();
        match coordinator.switch_to(&event.name, &snapshot) {
            Ok(switched) => {
                let Some(identity) = coordinator.active_identity() else {
                    continue;
                };
                if switched {
                    println!("→ Engine {} active ({:?})", identity.name(), event.source);
                }
                rpc_interface.send_notification(
                    "engine_changed",
                    engine_changed_payload(identity, switched),
                );
            }
            Err(e) => {
                warn!("Engine switch from {:?} failed: {}", event.source, e);
                rpc_interface.send_notification(
                    "engine_switch_failed",
                    serde_json::json!({
                        "engine": event.name,
                        "error": e.to_string(),
                    }),
                );
            }
        }
    }
}

pub fn engine_changed_payload(identity: EngineIdentity, switched: bool) -> serde_json::Value {
    serde_json::json!({
        "engine": identity.name(),
        "description": identity.description(),
        "surfaces": identity.surface_count(),
        "switched": switched,
    })
}
