use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::{DEFAULT_MARKERS_PATH, MARKERS_EXTENSION, MARKERS_PATH_ENV};

use crate::engine::assets::marker_collection::{Marker, MarkerCollection};
use crate::engine::core::app_state::AppState;
use crate::markers::composer::VenueMarkers;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Resource, Default)]
pub struct CollectionLoader {
    handle: Option<Handle<MarkerCollection>>,
}

/// What the loading phase should do this frame.
#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    Pending,
    Ready(Vec<Marker>),
    Failed,
}

/// Asset path for the collection, honouring an override when one is set.
pub fn resolve_markers_path(override_path: Option<String>) -> String {
    match override_path.map(|p| p.trim().to_string()) {
        Some(path) if !path.is_empty() => {
            if !path.ends_with(MARKERS_EXTENSION) {
                warn!(
                    "{} does not end in .{}, the JSON loader will not pick it up",
                    path, MARKERS_EXTENSION
                );
            }
            path
        }
        _ => DEFAULT_MARKERS_PATH.to_string(),
    }
}

fn markers_path() -> String {
    #[cfg(not(target_arch = "wasm32"))]
    {
        resolve_markers_path(std::env::var(MARKERS_PATH_ENV).ok())
    }

    #[cfg(target_arch = "wasm32")]
    {
        resolve_markers_path(None)
    }
}

pub fn start_loading(mut loader: ResMut<CollectionLoader>, asset_server: Res<AssetServer>) {
    let path = markers_path();
    info!("Loading marker collection from: {}", path);
    loader.handle = Some(asset_server.load(path));
}

pub fn load_outcome(state: &LoadState, collection: Option<&MarkerCollection>) -> LoadOutcome {
    match (state, collection) {
        (LoadState::Failed(_), _) => LoadOutcome::Failed,
        (LoadState::Loaded, Some(collection)) => LoadOutcome::Ready(collection.markers.clone()),
        _ => LoadOutcome::Pending,
    }
}

/// Apply a finished load to the venue. Returns the marker count once loading is
/// over, `None` while the asset is still pending.
pub fn settle_venue(venue: &mut VenueMarkers, outcome: LoadOutcome) -> Option<usize> {
    match outcome {
        LoadOutcome::Pending => return None,
        LoadOutcome::Ready(_) if venue.host_supplied => {
            info!(
                "Marker collection loaded, keeping the {} markers sent by the host",
                venue.markers.len()
            );
        }
        LoadOutcome::Ready(markers) => {
            info!("✓ Marker collection loaded ({} markers)", markers.len());
            venue.markers = markers;
        }
        LoadOutcome::Failed => {}
    }
    Some(venue.markers.len())
}

pub fn poll_collection_load(
    loader: Res<CollectionLoader>,
    asset_server: Res<AssetServer>,
    collections: Res<Assets<MarkerCollection>>,
    mut venue: ResMut<VenueMarkers>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };
    let state = asset_server.load_state(handle);
    if let LoadState::Failed(err) = &state {
        warn!("Marker collection failed to load: {}. Keeping the current markers", err);
    }

    let outcome = load_outcome(&state, collections.get(handle));
    let Some(count) = settle_venue(&mut venue, outcome) else {
        return;
    };

    rpc_interface.send_notification("venue_loaded", serde_json::json!({ "count": count }));
    next_state.set(AppState::Running);
}

/// Push hot-reloaded edits of the collection file into the scene.
pub fn sync_reloaded_collection(
    mut events: EventReader<AssetEvent<MarkerCollection>>,
    loader: Res<CollectionLoader>,
    collections: Res<Assets<MarkerCollection>>,
    mut venue: ResMut<VenueMarkers>,
) {
    let Some(handle) = loader.handle.as_ref() else {
        return;
    };

    for event in events.read() {
        if !event.is_modified(handle) || venue.host_supplied {
            continue;
        }
        if let Some(collection) = collections.get(handle) {
            info!("Marker collection changed on disk ({} markers)", collection.markers.len());
            venue.markers = collection.markers.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_path_wins_when_set() {
        assert_eq!(resolve_markers_path(None), DEFAULT_MARKERS_PATH);
        assert_eq!(resolve_markers_path(Some("  ".into())), DEFAULT_MARKERS_PATH);
        assert_eq!(
            resolve_markers_path(Some("venues/hall_b.markers.json".into())),
            "venues/hall_b.markers.json"
        );
    }

    #[test]
    fn outcome_waits_for_the_asset() {
        let collection = MarkerCollection {
            markers: vec![Marker::new("s1", "stage", Vec3::ZERO, "Main Stage")],
        };
        assert_eq!(load_outcome(&LoadState::Loading, None), LoadOutcome::Pending);
        assert_eq!(load_outcome(&LoadState::Loaded, None), LoadOutcome::Pending);
        assert_eq!(
            load_outcome(&LoadState::Loaded, Some(&collection)),
            LoadOutcome::Ready(collection.markers.clone())
        );
    }

    #[test]
    fn finished_load_fills_an_empty_venue() {
        let mut venue = VenueMarkers::default();
        assert_eq!(settle_venue(&mut venue, LoadOutcome::Pending), None);

        let markers = vec![
            Marker::new("d1", "booth", Vec3::ZERO, "Demo Booth"),
            Marker::new("d2", "food", Vec3::X, "Demo Food"),
        ];
        assert_eq!(settle_venue(&mut venue, LoadOutcome::Ready(markers)), Some(2));
        assert_eq!(venue.markers[1].name, "Demo Food");
    }

    #[test]
    fn host_markers_sent_during_loading_survive_the_file() {
        let mut venue = VenueMarkers::default();
        venue.replace_from_host(vec![Marker::new("h1", "stage", Vec3::ZERO, "Host Stage")]);
        assert_eq!(settle_venue(&mut venue, LoadOutcome::Pending), None);

        let file = vec![Marker::new("d1", "booth", Vec3::ZERO, "Demo Booth")];
        assert_eq!(settle_venue(&mut venue, LoadOutcome::Ready(file)), Some(1));
        assert_eq!(venue.markers.len(), 1);
        assert_eq!(venue.markers[0].id.as_str(), "h1");
    }

    #[test]
    fn failed_load_keeps_whatever_is_already_shown() {
        let mut venue = VenueMarkers::default();
        assert_eq!(settle_venue(&mut venue, LoadOutcome::Failed), Some(0));
    }

    #[test]
    fn hot_reload_leaves_host_markers_alone() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Assets::<MarkerCollection>::default())
            .init_resource::<VenueMarkers>()
            .add_event::<AssetEvent<MarkerCollection>>()
            .add_systems(Update, sync_reloaded_collection);

        let handle = app
            .world_mut()
            .resource_mut::<Assets<MarkerCollection>>()
            .add(MarkerCollection {
                markers: vec![Marker::new("b1", "booth", Vec3::ZERO, "Booth 1")],
            });
        let id = handle.id();
        app.insert_resource(CollectionLoader { handle: Some(handle) });
        app.world_mut()
            .resource_mut::<VenueMarkers>()
            .replace_from_host(Vec::new());

        app.world_mut().send_event(AssetEvent::Modified { id });
        app.update();

        assert!(app.world().resource::<VenueMarkers>().markers.is_empty());
    }

    #[test]
    fn modified_collection_replaces_the_venue() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Assets::<MarkerCollection>::default())
            .init_resource::<VenueMarkers>()
            .add_event::<AssetEvent<MarkerCollection>>()
            .add_systems(Update, sync_reloaded_collection);

        let handle = app
            .world_mut()
            .resource_mut::<Assets<MarkerCollection>>()
            .add(MarkerCollection {
                markers: vec![Marker::new("b1", "booth", Vec3::ZERO, "Booth 1")],
            });
        let id = handle.id();
        app.insert_resource(CollectionLoader { handle: Some(handle) });

        app.world_mut().send_event(AssetEvent::Modified { id });
        app.update();

        let venue = app.world().resource::<VenueMarkers>();
        assert_eq!(venue.markers.len(), 1);
        assert_eq!(venue.markers[0].name, "Booth 1");
    }
}
