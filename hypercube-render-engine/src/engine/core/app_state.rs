use crate::persistence::collection::{CollectionDocument, CollectionLibrary};
use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::persistence::PRESET_COLLECTION_PATH;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Resource)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

/// Handle to the bundled preset collection while it loads.
#[derive(Resource, Default)]
pub struct PresetLoader {
    handle: Option<Handle<CollectionDocument>>,
}

pub fn start_loading(mut preset_loader: ResMut<PresetLoader>, asset_server: Res<AssetServer>) {
    println!("Loading presets from: {}", PRESET_COLLECTION_PATH);
    preset_loader.handle = Some(asset_server.load(PRESET_COLLECTION_PATH));
}

/// Moves to Running once the presets are imported, or once they are known to be missing.
/// A preset file that fails validation is skipped as a whole.
pub fn transition_to_running(
    preset_loader: Res<PresetLoader>,
    asset_server: Res<AssetServer>,
    documents: Res<Assets<CollectionDocument>>,
    mut library: ResMut<CollectionLibrary>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(handle) = preset_loader.handle.as_ref() else {
        next_state.set(AppState::Running);
        return;
    };

    if let Some(document) = documents.get(handle) {
        match library.import(document) {
            Ok(count) => println!("✓ {} presets loaded", count),
            Err(e) => warn!("Preset collection rejected: {}", e),
        }
    } else if matches!(asset_server.load_state(handle.id()), LoadState::Failed(_)) {
        warn!("Preset collection unavailable, starting without presets");
    } else {
        return;
    }

    println!("→ All systems ready, transitioning to Running state");
    next_state.set(AppState::Running);
}
