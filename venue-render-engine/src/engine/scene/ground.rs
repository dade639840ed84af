use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use constants::scene_settings::{GROUND_COLOR, GROUND_SIZE};

#[derive(Component)]
pub struct GroundPlane;

pub fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        GroundPlane,
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GROUND_COLOR,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
        NotShadowCaster,
        // Clicks on empty floor must not count as marker hits.
        Pickable::IGNORE,
    ));
}
