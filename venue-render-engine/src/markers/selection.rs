//! Scene-wide single selection, opened by secondary click on a marker and
//! closed only by an explicit dismissal.

use bevy::prelude::*;

use super::composer::MarkerInstance;
use super::interactions::{MarkerPointerAction, MarkerPointerEvent};
use super::kind::MarkerKind;
use crate::engine::assets::marker_collection::Marker;
use crate::rpc::web_rpc::WebRpcInterface;

/// The one authoritative selection. Holds a snapshot of the record so the
/// popup keeps rendering if the marker later leaves the collection.
#[derive(Resource, Default, Debug)]
pub struct MarkerSelection {
    selected: Option<Marker>,
}

impl MarkerSelection {
    /// Replace the current selection, no history is kept.
    pub fn select(&mut self, marker: Marker) {
        self.selected = Some(marker);
    }

    /// Returns the discarded selection. Clearing nothing is a no-op.
    pub fn clear(&mut self) -> Option<Marker> {
        self.selected.take()
    }

    pub fn current(&self) -> Option<&Marker> {
        self.selected.as_ref()
    }
}

/// Fired once per secondary-click selection, including re-selecting the same marker.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MarkerClicked {
    pub marker: Marker,
}

/// Explicit dismissal from the popup close button or the host page.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SelectionDismissed;

/// Optional embedder callback, the Rust side of `onMarkerClick`.
#[derive(Resource)]
pub struct MarkerClickListener(Box<dyn Fn(&Marker) + Send + Sync>);

impl MarkerClickListener {
    pub fn new(callback: impl Fn(&Marker) + Send + Sync + 'static) -> Self {
        Self(Box::new(callback))
    }
}

pub fn apply_marker_selection(
    mut events: EventReader<MarkerPointerEvent>,
    instances: Query<&MarkerInstance>,
    mut selection: ResMut<MarkerSelection>,
    mut clicked: EventWriter<MarkerClicked>,
) {
    for event in events.read() {
        if event.action != MarkerPointerAction::Select {
            continue;
        }
        let Ok(instance) = instances.get(event.marker) else {
            continue;
        };
        info!("Selected marker {} ({})", instance.marker.id, instance.marker.name);
        selection.select(instance.marker.clone());
        clicked.write(MarkerClicked {
            marker: instance.marker.clone(),
        });
    }
}

pub fn apply_selection_dismissal(
    mut events: EventReader<SelectionDismissed>,
    mut selection: ResMut<MarkerSelection>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if events.read().count() == 0 {
        return;
    }
    // Avoid tripping change detection when there is nothing to clear.
    if selection.current().is_none() {
        return;
    }
    if let Some(previous) = selection.clear() {
        info!("Selection cleared ({})", previous.id);
        rpc_interface.send_notification(
            "selection_cleared",
            serde_json::json!({ "id": previous.id }),
        );
    }
}

pub fn notify_click_listeners(
    mut events: EventReader<MarkerClicked>,
    listener: Option<Res<MarkerClickListener>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        if let Some(listener) = listener.as_ref() {
            (listener.0)(&event.marker);
        }
        let icon = MarkerKind::from_tag(&event.marker.kind).icon();
        rpc_interface.send_notification(
            "marker_click",
            serde_json::json!({ "marker": event.marker, "icon": icon.name() }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn marker(id: &str) -> Marker {
        Marker::new(id, "booth", Vec3::ZERO, id)
    }

    #[test]
    fn selecting_replaces_previous() {
        let mut selection = MarkerSelection::default();
        selection.select(marker("a"));
        selection.select(marker("b"));
        assert_eq!(selection.current().map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn selecting_twice_equals_selecting_once() {
        let mut once = MarkerSelection::default();
        once.select(marker("b"));
        let mut twice = MarkerSelection::default();
        twice.select(marker("b"));
        twice.select(marker("b"));
        assert_eq!(once.current(), twice.current());
    }

    #[test]
    fn clear_always_empties_and_is_idempotent() {
        let mut selection = MarkerSelection::default();
        assert!(selection.clear().is_none());
        selection.select(marker("a"));
        selection.select(marker("b"));
        assert_eq!(selection.clear().map(|m| m.id.0), Some("b".to_string()));
        assert!(selection.current().is_none());
        assert!(selection.clear().is_none());
    }

    fn selection_app(counter: Arc<AtomicUsize>) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<MarkerSelection>()
            .init_resource::<WebRpcInterface>()
            .insert_resource(MarkerClickListener::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .add_event::<MarkerPointerEvent>()
            .add_event::<MarkerClicked>()
            .add_event::<SelectionDismissed>()
            .add_systems(
                Update,
                (
                    apply_marker_selection,
                    apply_selection_dismissal,
                    notify_click_listeners,
                )
                    .chain(),
            );
        app
    }

    fn spawn_instance(app: &mut App, record: Marker) -> Entity {
        let kind = MarkerKind::from_tag(&record.kind);
        app.world_mut()
            .spawn(MarkerInstance {
                marker: record,
                kind,
            })
            .id()
    }

    #[test]
    fn secondary_click_selects_and_notifies_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = selection_app(counter.clone());
        let gate = spawn_instance(&mut app, Marker::new("e1", "entrance", Vec3::ZERO, "Main Gate"));

        app.world_mut().send_event(MarkerPointerEvent {
            marker: gate,
            action: MarkerPointerAction::Select,
        });
        app.update();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        let selection = app.world().resource::<MarkerSelection>();
        assert_eq!(selection.current().map(|m| m.name.as_str()), Some("Main Gate"));
        let clicks: Vec<_> = app
            .world()
            .resource::<WebRpcInterface>()
            .pending_notifications()
            .iter()
            .filter(|n| n.method == "marker_click")
            .collect();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].params["icon"], "door-open");

        app.world_mut().send_event(SelectionDismissed);
        app.update();
        assert!(app.world().resource::<MarkerSelection>().current().is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hover_events_do_not_select() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = selection_app(counter.clone());
        let booth = spawn_instance(&mut app, marker("b1"));

        app.world_mut().send_event(MarkerPointerEvent {
            marker: booth,
            action: MarkerPointerAction::Enter,
        });
        app.update();

        assert!(app.world().resource::<MarkerSelection>().current().is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn selection_survives_marker_removal() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = selection_app(counter);
        let booth = spawn_instance(&mut app, marker("b1"));

        app.world_mut().send_event(MarkerPointerEvent {
            marker: booth,
            action: MarkerPointerAction::Select,
        });
        app.update();
        app.world_mut().despawn(booth);
        app.update();

        let selection = app.world().resource::<MarkerSelection>();
        assert_eq!(selection.current().map(|m| m.id.as_str()), Some("b1"));
    }
}
