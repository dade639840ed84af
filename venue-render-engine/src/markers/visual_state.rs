//! Per-marker hover state machine and the per-frame animation rule.
//!
//! `Idle <-> Hovered` follows pointer enter/leave. On top of that, every frame
//! recomputes the marker height from the clock, so the bob is a pure function
//! of `(t, hovered, base)` rather than a stored tween.

use bevy::asset::RenderAssetUsages;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use constants::marker_settings::{
    GLOW_SHELL_ALPHA, GLOW_SHELL_SCALE, HOVER_BOB_AMPLITUDE, HOVER_BOB_RATE,
};

use super::interactions::{MarkerPointerAction, MarkerPointerEvent};

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered,
}

impl HoverState {
    pub fn is_hovered(self) -> bool {
        self == Self::Hovered
    }

    /// Next state for a pointer action. Selection does not affect hover.
    pub fn after(self, action: MarkerPointerAction) -> Self {
        match action {
            MarkerPointerAction::Enter => Self::Hovered,
            MarkerPointerAction::Leave => Self::Idle,
            MarkerPointerAction::Select => self,
        }
    }
}

/// Resting translation of a marker root, the `base` of the animation rule.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MarkerBase {
    pub translation: Vec3,
}

/// Oversized wireframe shell shown around a hovered marker.
#[derive(Component)]
pub struct GlowShell;

/// Vertical offset from the base for the current clock reading.
pub fn hover_offset(elapsed_secs: f32, hovered: bool) -> f32 {
    if hovered {
        (elapsed_secs * HOVER_BOB_RATE).sin() * HOVER_BOB_AMPLITUDE
    } else {
        0.0
    }
}

pub fn animated_y(elapsed_secs: f32, hovered: bool, base_y: f32) -> f32 {
    base_y + hover_offset(elapsed_secs, hovered)
}

pub fn apply_hover_transitions(
    mut events: EventReader<MarkerPointerEvent>,
    mut markers: Query<&mut HoverState>,
) {
    for event in events.read() {
        // Removed markers are no longer in the query and simply drop the event.
        let Ok(mut state) = markers.get_mut(event.marker) else {
            continue;
        };
        let next = state.after(event.action);
        if *state != next {
            debug!("Marker {:?} hover -> {:?}", event.marker, next);
            *state = next;
        }
    }
}

pub fn animate_markers(
    time: Res<Time>,
    mut markers: Query<(&HoverState, &MarkerBase, &mut Transform)>,
) {
    let t = time.elapsed_secs();
    for (state, base, transform) in &mut markers {
        let target = base
            .translation
            .with_y(animated_y(t, state.is_hovered(), base.translation.y));
        // Only write when the pose actually moves.
        transform
            .map_unchanged(|transform| &mut transform.translation)
            .set_if_neq(target);
    }
}

pub fn sync_glow_shells(
    markers: Query<(&HoverState, &Children), Changed<HoverState>>,
    mut shells: Query<&mut Visibility, With<GlowShell>>,
) {
    for (state, children) in &markers {
        for &child in &**children {
            if let Ok(mut visibility) = shells.get_mut(child) {
                *visibility = if state.is_hovered() {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
        }
    }
}

/// Spawn the hidden glow shell as a child of the marker root, sized from the
/// model bounds. It is excluded from picking so it cannot steal hover.
pub fn spawn_glow_shell(
    commands: &mut Commands,
    marker: Entity,
    bounds: (Vec3, Vec3),
    color: Color,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let (min, max) = bounds;
    let centre = (min + max) * 0.5;
    let half_extents = ((max - min) * 0.5).max(Vec3::splat(0.05)) * GLOW_SHELL_SCALE;

    let material = materials.add(StandardMaterial {
        base_color: color.with_alpha(GLOW_SHELL_ALPHA),
        emissive: color.to_linear(),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            GlowShell,
            Name::new("glow_shell"),
            Mesh3d(meshes.add(wireframe_box_mesh(half_extents))),
            MeshMaterial3d(material),
            Transform::from_translation(centre),
            Visibility::Hidden,
            Pickable::IGNORE,
            NotShadowCaster,
            NotShadowReceiver,
            ChildOf(marker),
        ))
        .id()
}

/// Box edges plus one horizontal belt, as a line list.
pub fn wireframe_box_mesh(half_extents: Vec3) -> Mesh {
    let h = half_extents;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(12);
    for y in [-h.y, 0.0, h.y] {
        positions.extend([[-h.x, y, -h.z], [h.x, y, -h.z], [h.x, y, h.z], [-h.x, y, h.z]]);
    }

    let mut indices: Vec<u32> = Vec::new();
    for ring in 0..3u32 {
        let base = ring * 4;
        for i in 0..4u32 {
            indices.extend([base + i, base + (i + 1) % 4]);
        }
    }
    for i in 0..4u32 {
        indices.extend([i, i + 8]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
