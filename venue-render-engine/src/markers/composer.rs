//! Keeps the spawned marker entities in step with the current collection.
//!
//! Instances are keyed by marker id. A new collection is diffed against the
//! live instances: new ids mount, missing ids unmount, retained ids are updated
//! in place and keep their hover state. A retained marker whose type or colour
//! changed is remounted, since its model is built once at mount time.

use std::collections::HashMap;

use bevy::prelude::*;

use super::geometry::{resolve, spawn_model};
use super::interactions::{on_marker_click, on_marker_out, on_marker_over};
use super::kind::MarkerKind;
use super::label::LabelSlot;
use super::visual_state::{HoverState, MarkerBase, spawn_glow_shell};
use crate::engine::assets::marker_collection::{Marker, MarkerId};

/// The collection currently shown. Replacing it re-composes the scene.
#[derive(Resource, Default, Debug, Clone)]
pub struct VenueMarkers {
    pub markers: Vec<Marker>,
    /// Set once the host page has pushed its own collection. The collection
    /// file never overwrites host markers after that.
    pub host_supplied: bool,
}

impl VenueMarkers {
    pub fn replace_from_host(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        self.host_supplied = true;
    }
}

/// Root component of a mounted marker, holding the record it was built from.
#[derive(Component, Debug, Clone)]
pub struct MarkerInstance {
    pub marker: Marker,
    pub kind: MarkerKind,
}

/// id -> root entity for every mounted marker.
#[derive(Resource, Default, Debug)]
pub struct MarkerRegistry {
    instances: HashMap<MarkerId, Entity>,
}

impl MarkerRegistry {
    pub fn len(&self) -> usize {
        self.instances.len()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CollectionDiff {
    pub mount: Vec<MarkerId>,
    pub remount: Vec<MarkerId>,
    pub update: Vec<MarkerId>,
    pub unmount: Vec<MarkerId>,
}

impl CollectionDiff {
    pub fn is_empty(&self) -> bool {
        self.mount.is_empty()
            && self.remount.is_empty()
            && self.update.is_empty()
            && self.unmount.is_empty()
    }
}

/// Compare live records against the next collection by id only.
/// Unchanged records appear in no list.
pub fn diff_collection<'a>(
    previous: impl IntoIterator<Item = &'a Marker>,
    next: &[Marker],
) -> CollectionDiff {
    let previous: HashMap<&MarkerId, &Marker> = previous.into_iter().map(|m| (&m.id, m)).collect();
    let mut diff = CollectionDiff::default();

    for marker in next {
        match previous.get(&marker.id) {
            None => diff.mount.push(marker.id.clone()),
            Some(old) if marker.needs_new_model(old) => diff.remount.push(marker.id.clone()),
            Some(old) if *old != marker => diff.update.push(marker.id.clone()),
            Some(_) => {}
        }
    }

    let next_ids: std::collections::HashSet<&MarkerId> = next.iter().map(|m| &m.id).collect();
    let mut removed: Vec<MarkerId> = previous
        .keys()
        .filter(|id| !next_ids.contains(*id))
        .map(|id| (*id).clone())
        .collect();
    removed.sort();
    diff.unmount = removed;
    diff
}

pub fn reconcile_markers(
    mut commands: Commands,
    venue: Res<VenueMarkers>,
    mut registry: ResMut<MarkerRegistry>,
    mut instances: Query<(
        &mut MarkerInstance,
        &mut MarkerBase,
        &mut Transform,
        &mut LabelSlot,
        &mut HoverState,
    )>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !venue.is_changed() {
        return;
    }

    let live: Vec<Marker> = registry
        .instances
        .values()
        .filter_map(|&entity| instances.get(entity).ok())
        .map(|(instance, ..)| instance.marker.clone())
        .collect();
    let diff = diff_collection(&live, &venue.markers);
    if diff.is_empty() {
        return;
    }

    info!(
        "Reconciling markers: +{} ~{} -{} (remount {})",
        diff.mount.len(),
        diff.update.len(),
        diff.unmount.len(),
        diff.remount.len()
    );

    for id in diff.unmount.iter().chain(&diff.remount) {
        let Some(root) = registry.instances.remove(id) else {
            continue;
        };
        if let Ok((_, _, _, slot, _)) = instances.get(root) {
            if let Some(label) = slot.0 {
                commands.entity(label).despawn();
            }
        }
        commands.entity(root).despawn();
        debug!("Unmounted marker {}", id);
    }

    let records: HashMap<&MarkerId, &Marker> = venue.markers.iter().map(|m| (&m.id, m)).collect();

    for id in &diff.update {
        let (Some(&root), Some(&record)) = (registry.instances.get(id), records.get(id)) else {
            continue;
        };
        let Ok((mut instance, mut base, mut transform, mut slot, mut hover)) =
            instances.get_mut(root)
        else {
            continue;
        };
        let next = record.transform();
        base.translation = next.translation;
        transform.rotation = next.rotation;
        transform.scale = next.scale;
        instance.marker = record.clone();

        // A visible label carries the old text; drop it and let the label pass rebuild it.
        if let Some(label) = slot.0.take() {
            commands.entity(label).despawn();
            hover.set_changed();
        }
    }

    for id in diff.mount.iter().chain(&diff.remount) {
        let Some(&record) = records.get(id) else {
            continue;
        };
        let root = mount_marker(&mut commands, record, &mut meshes, &mut materials);
        registry.instances.insert(id.clone(), root);
    }
    info!("{} markers live", registry.len());
}

/// Spawn one marker root with its model, glow shell and pointer observers.
pub fn mount_marker(
    commands: &mut Commands,
    marker: &Marker,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let tint = marker.tint();
    let model = resolve(&marker.kind, tint);
    let transform = marker.transform();

    let root = commands
        .spawn((
            Name::new(format!("Marker {}", marker.id)),
            MarkerInstance {
                marker: marker.clone(),
                kind: model.kind.clone(),
            },
            HoverState::default(),
            MarkerBase {
                translation: transform.translation,
            },
            LabelSlot::default(),
            transform,
            Visibility::default(),
        ))
        .observe(on_marker_over)
        .observe(on_marker_out)
        .observe(on_marker_click)
        .with_children(|parent| spawn_model(parent, &model.root, meshes, materials))
        .id();

    spawn_glow_shell(commands, root, model.bounds(), tint, meshes, materials);
    debug!(
        "Mounted marker {} as {} ({} meshes)",
        marker.id,
        model.kind.tag(),
        model.mesh_count()
    );
    root
}
