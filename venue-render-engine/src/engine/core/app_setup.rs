use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::path::MARKERS_EXTENSION;
use constants::scene_settings::BACKGROUND_COLOR;

use crate::engine::assets::marker_collection::MarkerCollection;
use crate::engine::camera::viewport_camera::{camera_controller, spawn_viewport_camera};
use crate::engine::core::app_state::{AppState, log_running_state};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::collection_loader::{
    CollectionLoader, poll_collection_load, start_loading, sync_reloaded_collection,
};
use crate::engine::scene::ground::spawn_ground;
use crate::engine::scene::grid::{fade_grid_around_camera, spawn_ground_grid};
use crate::engine::scene::lighting::{ambient_fill, spawn_lighting};
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::markers::MarkerPlugin;
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MeshPickingPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers MarkerCollection as a loadable asset type from `*.markers.json` files.
        .add_plugins(JsonAssetPlugin::<MarkerCollection>::new(&[MARKERS_EXTENSION]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(MarkerPlugin)
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(ambient_fill())
        .init_resource::<CollectionLoader>();

    app.add_systems(
        Startup,
        (
            spawn_viewport_camera,
            spawn_lighting,
            spawn_ground,
            spawn_ground_grid,
            start_loading,
        ),
    )
    .add_systems(
        Update,
        poll_collection_load.run_if(in_state(AppState::Loading)),
    )
    .add_systems(OnEnter(AppState::Running), log_running_state);

    let runtime_systems = (
        (camera_controller, fade_grid_around_camera).chain(),
        sync_reloaded_collection,
        fps_notification_system,
    );
    app.add_systems(Update, runtime_systems.run_if(in_state(AppState::Running)));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_fps_overlay)
            .add_systems(Update, fps_text_update_system);
    }

    app
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
