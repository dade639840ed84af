use bevy::prelude::*;

use super::composer::MarkerInstance;

/// Pointer activity on a marker subtree, normalised to the marker root entity.
/// Observers only record these; state changes happen in the frame systems so
/// hover, selection and animation all see one consistent ordering.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPointerEvent {
    pub marker: Entity,
    pub action: MarkerPointerAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPointerAction {
    Enter,
    Leave,
    /// Secondary button click, the selection gesture.
    Select,
}

/// Walk up from a picked mesh to the marker root that owns it.
fn marker_root(
    mut entity: Entity,
    roots: &Query<(), With<MarkerInstance>>,
    parents: &Query<&ChildOf>,
) -> Option<Entity> {
    loop {
        if roots.contains(entity) {
            return Some(entity);
        }
        entity = parents.get(entity).ok()?.parent();
    }
}

pub fn on_marker_over(
    trigger: Trigger<Pointer<Over>>,
    roots: Query<(), With<MarkerInstance>>,
    parents: Query<&ChildOf>,
    mut events: EventWriter<MarkerPointerEvent>,
) {
    if let Some(marker) = marker_root(trigger.target(), &roots, &parents) {
        events.write(MarkerPointerEvent {
            marker,
            action: MarkerPointerAction::Enter,
        });
    }
}

pub fn on_marker_out(
    trigger: Trigger<Pointer<Out>>,
    roots: Query<(), With<MarkerInstance>>,
    parents: Query<&ChildOf>,
    mut events: EventWriter<MarkerPointerEvent>,
) {
    if let Some(marker) = marker_root(trigger.target(), &roots, &parents) {
        events.write(MarkerPointerEvent {
            marker,
            action: MarkerPointerAction::Leave,
        });
    }
}

/// Secondary click selects; the event is consumed here so nothing further up
/// the hierarchy or in the camera layer reacts to it.
pub fn on_marker_click(
    mut trigger: Trigger<Pointer<Click>>,
    roots: Query<(), With<MarkerInstance>>,
    parents: Query<&ChildOf>,
    mut events: EventWriter<MarkerPointerEvent>,
) {
    if trigger.event().button != PointerButton::Secondary {
        return;
    }
    trigger.propagate(false);

    if let Some(marker) = marker_root(trigger.target(), &roots, &parents) {
        events.write(MarkerPointerEvent {
            marker,
            action: MarkerPointerAction::Select,
        });
    }
}
