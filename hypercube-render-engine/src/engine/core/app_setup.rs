use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::adapters::StandardAdapterFactory;
use crate::engine::catalog::GeometryCatalog;
use crate::engine::coordinator::EngineCoordinator;
use crate::engine::core::app_state::{AppState, PresetLoader, start_loading, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::parameters::{ParameterStore, SessionRng};
use crate::engine::systems::{
    engine_switch::{EngineSwitchEvent, handle_engine_switch_events},
    fps_tracking::fps_notification_system,
    keyboard::keyboard_shortcut_system,
    parameter_sync::{PendingSnapshot, forward_parameter_changes},
    render::render_active_engine,
};
use crate::interaction::InteractionPlugin;
use crate::persistence::PersistencePlugin;
use crate::persistence::collection::CollectionDocument;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::FpsText;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::fps_text_update_system;

pub fn create_app() -> App {
    let mut app = App::new();
    let catalog = GeometryCatalog::default();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers the preset collection as a loadable JSON asset.
        .add_plugins(JsonAssetPlugin::<CollectionDocument>::new(&["collection.json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(InteractionPlugin)
        .add_plugins(PersistencePlugin);

    // Adapters hear about parameter writes through a store listener.
    let mut store = ParameterStore::default();
    let pending = PendingSnapshot::default();
    pending.attach(&mut store);

    // Only one adapter exists at a time; the factory shares the catalog cache.
    app.insert_resource(store)
        .insert_resource(pending)
        .init_resource::<SessionRng>()
        .init_resource::<PresetLoader>()
        .insert_resource(EngineCoordinator::new(Box::new(
            StandardAdapterFactory::new(catalog.0.clone()),
        )))
        .insert_resource(catalog)
        .add_event::<EngineSwitchEvent>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::Loading)),
        );

    // Switches land before the snapshot is forwarded so a new adapter never
    // draws a stale frame.
    let runtime_systems = (
        keyboard_shortcut_system,
        handle_engine_switch_events,
        forward_parameter_changes,
        render_active_engine,
        fps_notification_system,
    )
        .chain();

    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
