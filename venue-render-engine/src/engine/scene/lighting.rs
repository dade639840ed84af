use bevy::pbr::CascadeShadowConfigBuilder;
use bevy::prelude::*;
use constants::scene_settings::{
    ACCENT_LIGHTS, AMBIENT_LIGHT_BRIGHTNESS, AMBIENT_LIGHT_COLOR, AccentLight, KEY_LIGHT_COLOR,
    KEY_LIGHT_ILLUMINANCE, KEY_LIGHT_POSITION, KEY_LIGHT_SHADOW_DISTANCE, OVERHEAD_LIGHT,
};

pub fn ambient_fill() -> AmbientLight {
    AmbientLight {
        color: AMBIENT_LIGHT_COLOR,
        brightness: AMBIENT_LIGHT_BRIGHTNESS,
        ..default()
    }
}

/// Key light plus accents. The key light uses a single cascade so the shadow
/// volume stays fixed instead of tracking the camera frustum.
pub fn spawn_lighting(mut commands: Commands) {
    commands.spawn((
        Name::new("KeyLight"),
        DirectionalLight {
            color: KEY_LIGHT_COLOR,
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        CascadeShadowConfigBuilder {
            num_cascades: 1,
            minimum_distance: 0.1,
            maximum_distance: KEY_LIGHT_SHADOW_DISTANCE,
            ..default()
        }
        .build(),
    ));

    for (i, accent) in ACCENT_LIGHTS.iter().enumerate() {
        spawn_accent(&mut commands, format!("AccentLight{i}"), accent);
    }
    spawn_accent(&mut commands, "OverheadLight".to_string(), &OVERHEAD_LIGHT);
}

fn spawn_accent(commands: &mut Commands, name: String, accent: &AccentLight) {
    commands.spawn((
        Name::new(name),
        PointLight {
            color: accent.color,
            intensity: accent.intensity,
            range: accent.range,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(accent.position),
    ));
}
