use bevy::prelude::*;

/// Fixed starting pose of the orbit camera.
pub const CAMERA_INITIAL_POSITION: Vec3 = Vec3::new(20.0, 20.0, 20.0);
pub const CAMERA_INITIAL_FOCUS: Vec3 = Vec3::ZERO;
pub const CAMERA_FOV_DEGREES: f32 = 50.0;

/// Orbit distance bounds in world units.
pub const CAMERA_MIN_DISTANCE: f32 = 5.0;
pub const CAMERA_MAX_DISTANCE: f32 = 50.0;

/// Polar angle measured from straight up. The upper bound keeps the camera
/// at or above the horizon; the lower bound avoids the gimbal at the pole.
pub const CAMERA_MIN_POLAR_ANGLE: f32 = 0.01;
pub const CAMERA_MAX_POLAR_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

/// Radians per pixel of primary-drag.
pub const ROTATE_SENSITIVITY: f32 = 0.005;
/// World units per pixel of middle-drag, multiplied by the orbit distance.
pub const PAN_SENSITIVITY: f32 = 0.0015;
/// Fractional distance change per scroll line.
pub const ZOOM_STEP: f32 = 0.1;
/// Pixel scroll deltas are scaled down to line units.
pub const PIXEL_SCROLL_SCALE: f32 = 0.05;

/// Keyboard pan speed as a fraction of orbit distance per second.
pub const KEYBOARD_PAN_SPEED: f32 = 0.8;
/// Keyboard yaw speed in radians per second.
pub const KEYBOARD_YAW_SPEED: f32 = 1.0;

/// Exponential smoothing rate applied to the rendered camera transform.
pub const CAMERA_SMOOTHING: f32 = 12.0;
