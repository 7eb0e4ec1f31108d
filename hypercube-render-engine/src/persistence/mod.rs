//! Session state, share codes and variation collections.
//!
//! Every path back into the app goes through [`validation`], which rejects a
//! document as a whole and otherwise writes through the same clamping rules as
//! a live parameter change.
//!
//! ```text
//! startup: ?state= share code ──┐
//!          local storage ───────┴─> RestoredState ─> ParameterStore::replace
//!                                                  └─> EngineSwitchEvent
//! runtime: ParameterStore version / active engine ─> SaveDebounce ─> storage
//! ```

/// Collection documents and the in-memory variation library.
pub mod collection;

/// The stored session document.
pub mod saved_state;

/// URL-safe share codes.
pub mod share_code;

/// Startup restore and debounced saving.
pub mod state_sync;

/// Key/value backends: `localStorage` in the browser, memory elsewhere.
pub mod storage;

pub mod validation;

use crate::engine::core::app_state::AppState;
use bevy::prelude::*;
use collection::CollectionLibrary;
use state_sync::{debounced_save_system, restore_state_system};
use storage::StateStorage;

pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollectionLibrary>()
            .init_resource::<StateStorage>()
            .add_systems(OnEnter(AppState::Running), restore_state_system)
            .add_systems(
                Update,
                debounced_save_system.run_if(in_state(AppState::Running)),
            );
    }
}
