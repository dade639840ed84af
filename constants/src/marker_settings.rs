use bevy::prelude::*;

/// Vertical bob applied while a marker is hovered, in world units.
pub const HOVER_BOB_AMPLITUDE: f32 = 0.1;
/// Angular rate of the hover bob in radians per second.
pub const HOVER_BOB_RATE: f32 = 2.0;

/// Glow shell size relative to the marker model bounds.
pub const GLOW_SHELL_SCALE: f32 = 1.15;
pub const GLOW_SHELL_ALPHA: f32 = 0.35;

/// Label anchor relative to the marker origin.
pub const LABEL_ANCHOR_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 0.0);
/// Label scale is `LABEL_DISTANCE_FACTOR / camera_distance`, clamped.
pub const LABEL_DISTANCE_FACTOR: f32 = 20.0;
pub const LABEL_MIN_SCALE: f32 = 0.4;
pub const LABEL_MAX_SCALE: f32 = 1.6;
pub const LABEL_WIDTH: f32 = 220.0;
pub const LABEL_BACKGROUND: Color = Color::srgba(0.08, 0.09, 0.12, 0.92);
pub const INTERACTION_HINT: &str = "Right-click for details";

/// Fallback tint for markers whose colour cannot be parsed.
pub const DEFAULT_MARKER_COLOR: Color = Color::srgb(0.39, 0.40, 0.95);

// Detail popup
pub const POPUP_WIDTH: f32 = 300.0;
pub const POPUP_BACKGROUND: Color = Color::srgb(0.10, 0.11, 0.13);
pub const POPUP_HEADER_BACKGROUND: Color = Color::srgb(0.14, 0.16, 0.20);
