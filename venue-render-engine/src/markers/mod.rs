//! Venue markers: type lookup, 3D models, hover and selection.
//!
//! Pointer observers on each marker root only record [`interactions::MarkerPointerEvent`]s.
//! The frame systems below then run in a fixed order so a pointer change is
//! applied before that frame's animation pass.

/// Reconciles spawned marker entities with the current collection by id.
pub mod composer;

/// Procedural model per marker kind, the one place new kinds are added.
pub mod geometry;

/// Picking observers that translate pointer hits into marker events.
pub mod interactions;

/// Marker type tags and their icons.
pub mod kind;

/// Floating hover labels in the UI overlay.
pub mod label;

/// Detail popup for the selected marker.
pub mod popup;

/// Single scene-wide selection and click notifications.
pub mod selection;

/// Hover state machine, bob animation and glow shell.
pub mod visual_state;

use bevy::prelude::*;

use crate::engine::core::app_state::AppState;
use composer::{MarkerRegistry, VenueMarkers, reconcile_markers};
use interactions::MarkerPointerEvent;
use label::{position_hover_labels, sync_hover_labels};
use popup::{popup_close_button_interaction, refresh_detail_popup, spawn_detail_popup};
use selection::{
    MarkerClicked, MarkerSelection, SelectionDismissed, apply_marker_selection,
    apply_selection_dismissal, notify_click_listeners,
};
use visual_state::{animate_markers, apply_hover_transitions, sync_glow_shells};

pub struct MarkerPlugin;

impl Plugin for MarkerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VenueMarkers>()
            .init_resource::<MarkerRegistry>()
            .init_resource::<MarkerSelection>()
            .add_event::<MarkerPointerEvent>()
            .add_event::<MarkerClicked>()
            .add_event::<SelectionDismissed>()
            .add_systems(Startup, spawn_detail_popup)
            .add_systems(
                Update,
                (
                    popup_close_button_interaction,
                    reconcile_markers,
                    apply_hover_transitions,
                    apply_marker_selection,
                    apply_selection_dismissal,
                    sync_glow_shells,
                    sync_hover_labels,
                    animate_markers,
                    position_hover_labels,
                    notify_click_listeners,
                    refresh_detail_popup,
                )
                    .chain()
                    .run_if(in_state(AppState::Running)),
            );
    }
}
