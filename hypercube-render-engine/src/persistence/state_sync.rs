use super::collection::CollectionLibrary;
use super::saved_state::SavedState;
use super::share_code::decode_share_code;
use super::storage::{KeyValueStorage, StateStorage};
use super::validation::RestoredState;
use crate::engine::coordinator::{EngineCoordinator, EngineIdentity};
use crate::engine::parameters::{ParameterSet, ParameterStore};
use crate::engine::systems::engine_switch::{EngineSwitchEvent, SwitchSource};
use crate::error::StorageError;
use bevy::prelude::*;
use constants::persistence::{
    COLLECTION_STORAGE_KEY, SAVE_DEBOUNCE_SECS, SHARE_QUERY_PARAM, STATE_STORAGE_KEY,
};

#[cfg(target_arch = "wasm32")]
use web_sys::{UrlSearchParams, window};

/// Share code first, then the stored session, otherwise nothing.
pub fn startup_state(share_code: Option<&str>, storage: &dyn KeyValueStorage) -> Option<RestoredState> {
    if let Some(code) = share_code {
        match decode_share_code(code) {
            Ok(state) => return Some(state),
            Err(e) => warn!("Ignoring share code: {}", e),
        }
    }
    match storage.read(STATE_STORAGE_KEY) {
        Ok(Some(json)) => match SavedState::from_json(&json).and_then(|saved| saved.restore()) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Ignoring stored state: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Stored state unreadable: {}", e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn share_code_from_location() -> Option<String> {
    let search = window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(SHARE_QUERY_PARAM)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn share_code_from_location() -> Option<String> {
    let prefix = format!("--{}=", SHARE_QUERY_PARAM);
    std::env::args().find_map(|arg| arg.strip_prefix(&prefix).map(str::to_string))
}

pub fn now_millis() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub fn persist_state(
    storage: &mut dyn KeyValueStorage,
    params: &ParameterSet,
    identity: EngineIdentity,
) -> Result<(), StorageError> {
    let json = SavedState::capture(params, identity, now_millis())
        .to_json()
        .map_err(|e| StorageError::Write(e.to_string()))?;
    storage.write(STATE_STORAGE_KEY, &json)
}

pub fn persist_collection(storage: &mut dyn KeyValueStorage, library: &CollectionLibrary) -> Result<(), StorageError> {
    let json = serde_json::to_string(&library.export()).map_err(|e| StorageError::Write(e.to_string()))?;
    storage.write(COLLECTION_STORAGE_KEY, &json)
}

/// Restores the session once the app is running and activates its engine.
pub fn restore_state_system(
    storage: Res<StateStorage>,
    mut store: ResMut<ParameterStore>,
    mut library: ResMut<CollectionLibrary>,
    mut switches: EventWriter<EngineSwitchEvent>,
) {
    match storage.0.read(COLLECTION_STORAGE_KEY) {
        Ok(Some(json)) => match library.import_json(&json) {
            Ok(count) => println!("✓ {} saved variations restored", count),
            Err(e) => warn!("Ignoring stored collection: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("Stored collection unreadable: {}", e),
    }

    let code = share_code_from_location();
    let identity = match startup_state(code.as_deref(), storage.0.as_ref()) {
        Some(state) => {
            store.replace(&state.parameters);
            println!("✓ Session restored (engine {})", state.identity.name());
            state.identity
        }
        None => EngineIdentity::Volumetric,
    };
    switches.write(EngineSwitchEvent {
        name: identity.name().to_string(),
        source: SwitchSource::Restore,
    });
}

/// Tracks parameter version and engine so a quiet period triggers exactly one save.
#[derive(Debug, Default)]
pub struct SaveDebounce {
    version: u64,
    identity: Option<EngineIdentity>,
    pending_since: Option<f32>,
}

impl SaveDebounce {
    /// Returns true when the state has been still for the debounce window.
    pub fn observe(&mut self, version: u64, identity: Option<EngineIdentity>, now: f32) -> bool {
        if version != self.version || identity != self.identity {
            self.version = version;
            self.identity = identity;
            self.pending_since = Some(now);
            return false;
        }
        match self.pending_since {
            Some(since) if now - since >= SAVE_DEBOUNCE_SECS => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

pub fn debounced_save_system(
    time: Res<Time>,
    store: Res<ParameterStore>,
    coordinator: Res<EngineCoordinator>,
    mut storage: ResMut<StateStorage>,
    mut debounce: Local<SaveDebounce>,
) {
    let identity = coordinator.active_identity();
    if !debounce.observe(store.version(), identity, time.elapsed_secs()) {
        return;
    }
    let Some(identity) = identity else {
        return;
    };
    if let Err(e) = persist_state(storage.0.as_mut(), &store.snapshot(), identity) {
        warn!("Session not saved: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parameters::Channel;
    use crate::persistence::share_code::encode_share_code;
    use crate::persistence::storage::MemoryStorage;

    fn stored(params: &ParameterSet, identity: EngineIdentity) -> MemoryStorage {
        let mut storage = MemoryStorage::default();
        persist_state(&mut storage, params, identity).unwrap();
        storage
    }

    #[test]
    fn share_code_takes_precedence_over_storage() {
        let mut saved = ParameterSet::defaults();
        saved.set_clamped(Channel::Hue, 10.0);
        let storage = stored(&saved, EngineIdentity::Volumetric);

        let mut shared = ParameterSet::defaults();
        shared.set_clamped(Channel::Hue, 300.0);
        let code = encode_share_code(&shared, EngineIdentity::Layered).unwrap();

        let state = startup_state(Some(code.as_str()), &storage).unwrap();
        assert_eq!(state.parameters.get(Channel::Hue), 300.0);
        assert_eq!(state.identity, EngineIdentity::Layered);
    }

    #[test]
    fn bad_share_code_falls_back_to_storage() {
        let mut saved = ParameterSet::defaults();
        saved.set_clamped(Channel::Chaos, 0.75);
        let storage = stored(&saved, EngineIdentity::Faceted);
        let state = startup_state(Some("%%%"), &storage).unwrap();
        assert_eq!(state.parameters, saved);
    }

    #[test]
    fn nothing_stored_means_defaults() {
        assert!(startup_state(None, &MemoryStorage::default()).is_none());
        let mut corrupt = MemoryStorage::default();
        corrupt.write(STATE_STORAGE_KEY, "{").unwrap();
        assert!(startup_state(None, &corrupt).is_none());
    }

    #[test]
    fn saves_once_after_a_quiet_period() {
        let mut debounce = SaveDebounce::default();
        let engine = Some(EngineIdentity::Volumetric);
        assert!(!debounce.observe(1, engine, 0.0));
        assert!(!debounce.observe(2, engine, 0.5));
        assert!(!debounce.observe(2, engine, 1.0));
        assert!(debounce.observe(2, engine, 1.3));
        assert!(!debounce.observe(2, engine, 5.0));
        assert!(!debounce.observe(2, Some(EngineIdentity::Faceted), 5.1));
        assert!(debounce.observe(2, Some(EngineIdentity::Faceted), 6.0));
    }
}
