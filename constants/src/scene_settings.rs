use bevy::prelude::*;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.06, 0.07, 0.10);

// Ambient fill
pub const AMBIENT_LIGHT_COLOR: Color = Color::WHITE;
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 300.0;

// Directional key light, the only shadow caster in the rig
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
pub const KEY_LIGHT_ILLUMINANCE: f32 = 6_000.0;
pub const KEY_LIGHT_COLOR: Color = Color::WHITE;
/// Far bound of the single shadow cascade, covering the whole floor.
pub const KEY_LIGHT_SHADOW_DISTANCE: f32 = 60.0;

pub struct AccentLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}

pub const ACCENT_LIGHTS: [AccentLight; 2] = [
    AccentLight {
        position: Vec3::new(-10.0, 10.0, -10.0),
        color: Color::srgb(0.39, 0.40, 0.95),
        intensity: 400_000.0,
        range: 40.0,
    },
    AccentLight {
        position: Vec3::new(10.0, 10.0, 10.0),
        color: Color::srgb(0.93, 0.28, 0.60),
        intensity: 400_000.0,
        range: 40.0,
    },
];

pub const OVERHEAD_LIGHT: AccentLight = AccentLight {
    position: Vec3::new(0.0, 15.0, 0.0),
    color: Color::srgb(1.0, 0.95, 0.85),
    intensity: 600_000.0,
    range: 50.0,
};

// Ground plane
pub const GROUND_SIZE: f32 = 100.0;
pub const GROUND_COLOR: Color = Color::srgb(0.12, 0.13, 0.16);

// Reference grid
pub const GRID_EXTENT: f32 = 50.0;
pub const GRID_CELL_SIZE: f32 = 1.0;
pub const GRID_SECTION_SIZE: f32 = 5.0;
pub const GRID_CELL_COLOR: Color = Color::srgb(0.44, 0.44, 0.44);
pub const GRID_SECTION_COLOR: Color = Color::srgb(0.62, 0.29, 0.29);
/// Distance from the camera's ground point at which lines become fully transparent.
pub const GRID_FADE_DISTANCE: f32 = 60.0;
pub const GRID_FADE_STRENGTH: f32 = 1.0;
/// Lift above the ground plane to avoid depth fighting.
pub const GRID_HEIGHT: f32 = 0.01;
