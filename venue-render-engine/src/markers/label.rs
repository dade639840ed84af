//! Floating hover label drawn in the UI overlay above a hovered marker.

use bevy::prelude::*;
use constants::marker_settings::{
    INTERACTION_HINT, LABEL_ANCHOR_OFFSET, LABEL_BACKGROUND, LABEL_DISTANCE_FACTOR,
    LABEL_MAX_SCALE, LABEL_MIN_SCALE, LABEL_WIDTH,
};

use super::composer::MarkerInstance;
use super::kind::{MarkerIcon, MarkerKind};
use super::visual_state::HoverState;
use crate::engine::assets::marker_collection::Marker;

/// Overlay panel belonging to one hovered marker.
#[derive(Component)]
pub struct HoverLabel {
    pub marker: Entity,
}

/// The marker's live label, if it is currently hovered.
#[derive(Component, Default, Debug)]
pub struct LabelSlot(pub Option<Entity>);

#[derive(Debug, Clone, PartialEq)]
pub enum LabelLine {
    Header { icon: MarkerIcon, name: String },
    Description(String),
    Capacity(u32),
    Hint,
}

impl LabelLine {
    pub fn text(&self) -> String {
        match self {
            Self::Header { name, .. } => name.clone(),
            Self::Description(description) => description.clone(),
            Self::Capacity(capacity) => format!("Capacity: {capacity}"),
            Self::Hint => INTERACTION_HINT.to_string(),
        }
    }
}

/// Lines shown in the label. Optional fields are omitted, never blank.
pub fn label_lines(marker: &Marker, kind: &MarkerKind) -> Vec<LabelLine> {
    let mut lines = vec![LabelLine::Header {
        icon: kind.icon(),
        name: marker.name.clone(),
    }];
    if let Some(description) = marker.description.as_ref().filter(|d| !d.trim().is_empty()) {
        lines.push(LabelLine::Description(description.clone()));
    }
    if let Some(capacity) = marker.capacity {
        lines.push(LabelLine::Capacity(capacity));
    }
    lines.push(LabelLine::Hint);
    lines
}

/// Inverse-distance scale that keeps the label legible at any zoom.
pub fn label_scale(camera_distance: f32) -> f32 {
    (LABEL_DISTANCE_FACTOR / camera_distance.max(f32::EPSILON))
        .clamp(LABEL_MIN_SCALE, LABEL_MAX_SCALE)
}

pub fn sync_hover_labels(
    mut commands: Commands,
    mut markers: Query<(Entity, &HoverState, &MarkerInstance, &mut LabelSlot), Changed<HoverState>>,
) {
    for (entity, state, instance, mut slot) in &mut markers {
        match (state.is_hovered(), slot.0) {
            (true, None) => {
                let lines = label_lines(&instance.marker, &instance.kind);
                slot.0 = Some(spawn_label(&mut commands, entity, &lines, instance.marker.tint()));
            }
            (false, Some(label)) => {
                commands.entity(label).despawn();
                slot.0 = None;
            }
            _ => {}
        }
    }
}

fn spawn_label(
    commands: &mut Commands,
    marker: Entity,
    lines: &[LabelLine],
    tint: Color,
) -> Entity {
    commands
        .spawn((
            HoverLabel { marker },
            Name::new("HoverLabel"),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(LABEL_WIDTH),
                padding: UiRect::all(Val::Px(10.0)),
                border: UiRect::all(Val::Px(1.0)),
                row_gap: Val::Px(4.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(LABEL_BACKGROUND),
            BorderColor(tint),
            BorderRadius::all(Val::Px(8.0)),
            GlobalZIndex(10),
            // Hidden until the first positioning pass has a screen position.
            Visibility::Hidden,
            Pickable::IGNORE,
        ))
        .with_children(|panel| {
            for line in lines {
                match line {
                    LabelLine::Header { icon, name } => {
                        panel
                            .spawn((
                                Node {
                                    flex_direction: FlexDirection::Row,
                                    align_items: AlignItems::Center,
                                    column_gap: Val::Px(6.0),
                                    ..default()
                                },
                                Pickable::IGNORE,
                            ))
                            .with_children(|row| {
                                row.spawn((
                                    Text::new(icon.glyph()),
                                    TextFont { font_size: 12.0, ..default() },
                                    TextColor(tint),
                                    Pickable::IGNORE,
                                ));
                                row.spawn((
                                    Text::new(name.clone()),
                                    TextFont { font_size: 16.0, ..default() },
                                    TextColor(Color::WHITE),
                                    Pickable::IGNORE,
                                ));
                            });
                    }
                    LabelLine::Hint => {
                        panel.spawn((
                            Text::new(line.text()),
                            TextFont { font_size: 11.0, ..default() },
                            TextColor(Color::srgb(0.55, 0.57, 0.62)),
                            Pickable::IGNORE,
                        ));
                    }
                    _ => {
                        panel.spawn((
                            Text::new(line.text()),
                            TextFont { font_size: 13.0, ..default() },
                            TextColor(Color::srgb(0.82, 0.84, 0.88)),
                            Pickable::IGNORE,
                        ));
                    }
                }
            }
        })
        .id()
}

/// Place each live label above its marker and scale it by camera distance.
/// Anchors behind the camera hide the label.
pub fn position_hover_labels(
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    markers: Query<&GlobalTransform, With<MarkerInstance>>,
    mut labels: Query<(&HoverLabel, &mut Node, &mut Transform, &mut Visibility)>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let viewport_height = camera
        .logical_viewport_size()
        .map(|size| size.y)
        .unwrap_or_default();

    for (label, mut node, mut transform, mut visibility) in &mut labels {
        let Ok(marker_transform) = markers.get(label.marker) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        let anchor = marker_transform.transform_point(LABEL_ANCHOR_OFFSET);

        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(screen) => {
                node.left = Val::Px(screen.x - LABEL_WIDTH * 0.5);
                node.bottom = Val::Px(viewport_height - screen.y);
                let scale = label_scale(camera_transform.translation().distance(anchor));
                transform.scale = Vec3::new(scale, scale, 1.0);
                *visibility = Visibility::Visible;
            }
            Err(_) => *visibility = Visibility::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::marker_collection::Marker;

    #[test]
    fn minimal_marker_shows_only_name_and_hint() {
        let marker = Marker::new("e1", "entrance", Vec3::ZERO, "Main Gate");
        let kind = MarkerKind::from_tag(&marker.kind);
        let lines = label_lines(&marker, &kind);
        assert_eq!(
            lines,
            vec![
                LabelLine::Header {
                    icon: MarkerIcon::DoorOpen,
                    name: "Main Gate".into()
                },
                LabelLine::Hint,
            ]
        );
    }

    #[test]
    fn optional_fields_appear_when_present() {
        let marker = Marker::new("s1", "stage", Vec3::ZERO, "Main Stage")
            .with_description("Headliners from 8pm")
            .with_capacity(500);
        let lines = label_lines(&marker, &MarkerKind::Stage);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].text(), "Headliners from 8pm");
        assert_eq!(lines[2].text(), "Capacity: 500");
        assert_eq!(lines[3].text(), INTERACTION_HINT);
    }

    #[test]
    fn blank_description_is_omitted() {
        let marker = Marker::new("b1", "booth", Vec3::ZERO, "Booth").with_description("  ");
        let lines = label_lines(&marker, &MarkerKind::Booth);
        assert!(!lines.iter().any(|line| matches!(line, LabelLine::Description(_))));
    }

    #[test]
    fn unknown_type_label_uses_default_icon() {
        let marker = Marker::new("u1", "unknown_type_xyz", Vec3::ZERO, "Mystery");
        let kind = MarkerKind::from_tag(&marker.kind);
        let LabelLine::Header { icon, .. } = &label_lines(&marker, &kind)[0] else {
            panic!("first line must be the header");
        };
        assert_eq!(*icon, MarkerIcon::DEFAULT);
    }

    #[test]
    fn label_scale_shrinks_with_distance_and_is_clamped() {
        assert!(label_scale(10.0) > label_scale(30.0));
        assert_eq!(label_scale(0.0), LABEL_MAX_SCALE);
        assert_eq!(label_scale(1_000.0), LABEL_MIN_SCALE);
    }
}
