use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::camera_settings::*;

/// What a held mouse button does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraGesture {
    Rotate,
    Pan,
}

impl CameraGesture {
    /// Secondary and extra buttons map to nothing.
    pub fn for_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(Self::Rotate),
            MouseButton::Middle => Some(Self::Pan),
            _ => None,
        }
    }
}

/// Orbit rig around a focus point on the ground. `polar` is measured from
/// straight up, so `FRAC_PI_2` puts the eye on the horizon.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub polar: f32,
}

impl ViewportCamera {
    pub fn from_pose(position: Vec3, focus_point: Vec3) -> Self {
        let offset = position - focus_point;
        let distance = offset.length().max(f32::EPSILON);
        let mut rig = Self {
            focus_point,
            distance,
            yaw: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
        };
        rig.clamp();
        rig
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(CAMERA_MIN_DISTANCE, CAMERA_MAX_DISTANCE);
        self.polar = self.polar.clamp(CAMERA_MIN_POLAR_ANGLE, CAMERA_MAX_POLAR_ANGLE);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let direction = Vec3::new(sin_polar * sin_yaw, cos_polar, sin_polar * cos_yaw);
        self.focus_point + self.distance * direction
    }

    pub fn target_transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus_point, Vec3::Y)
    }

    /// Ground-plane right and forward axes for the current yaw.
    fn ground_axes(&self) -> (Vec3, Vec3) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        let forward = Vec3::new(-sin_yaw, 0.0, -cos_yaw);
        (right, forward)
    }

    pub fn rotate(&mut self, pixels: Vec2) {
        self.yaw -= pixels.x * ROTATE_SENSITIVITY;
        self.polar -= pixels.y * ROTATE_SENSITIVITY;
        self.clamp();
    }

    /// Drag the ground under the cursor; the focus stays on the ground plane.
    pub fn pan(&mut self, pixels: Vec2) {
        let (right, forward) = self.ground_axes();
        let scale = PAN_SENSITIVITY * self.distance;
        self.focus_point += (-right * pixels.x + forward * pixels.y) * scale;
    }

    /// Positive `lines` zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.distance *= 1.0 - lines * ZOOM_STEP;
        self.clamp();
    }

    /// `input.x` is right, `input.y` is forward, in keyboard units per second.
    pub fn keyboard_pan(&mut self, input: Vec2, delta_secs: f32) {
        if input == Vec2::ZERO {
            return;
        }
        let (right, forward) = self.ground_axes();
        let direction = (right * input.x + forward * input.y).normalize_or_zero();
        self.focus_point += direction * KEYBOARD_PAN_SPEED * self.distance * delta_secs;
    }

    pub fn keyboard_yaw(&mut self, input: f32, delta_secs: f32) {
        self.yaw += input * KEYBOARD_YAW_SPEED * delta_secs;
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::from_pose(CAMERA_INITIAL_POSITION, CAMERA_INITIAL_FOCUS)
    }
}

/// Spawn the perspective camera at its fixed starting pose.
pub fn spawn_viewport_camera(mut commands: Commands) {
    let rig = ViewportCamera::default();
    commands.spawn((
        Name::new("ViewportCamera"),
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            ..default()
        }),
        rig.target_transform(),
    ));
    commands.insert_resource(rig);
}

fn key_axis(keyboard: &ButtonInput<KeyCode>, positive: KeyCode, negative: KeyCode) -> f32 {
    let mut axis = 0.0;
    if keyboard.pressed(positive) {
        axis += 1.0;
    }
    if keyboard.pressed(negative) {
        axis -= 1.0;
    }
    axis
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut rig: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    let gesture = mouse_button
        .get_pressed()
        .find_map(|button| CameraGesture::for_button(*button));

    if mouse_delta != Vec2::ZERO {
        match gesture {
            Some(CameraGesture::Rotate) => rig.rotate(mouse_delta),
            Some(CameraGesture::Pan) => rig.pan(mouse_delta),
            None => {}
        }
    }

    let scroll: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * PIXEL_SCROLL_SCALE,
        })
        .sum();
    if scroll.abs() > f32::EPSILON {
        rig.zoom(scroll);
    }

    let dt = time.delta_secs();
    let pan_input = Vec2::new(
        key_axis(&keyboard, KeyCode::KeyD, KeyCode::KeyA),
        key_axis(&keyboard, KeyCode::KeyW, KeyCode::KeyS),
    );
    rig.keyboard_pan(pan_input, dt);

    let yaw_input = key_axis(&keyboard, KeyCode::KeyQ, KeyCode::KeyE);
    if yaw_input != 0.0 {
        rig.keyboard_yaw(yaw_input, dt);
    }

    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };
    let target = rig.target_transform();
    let lerp_speed = (CAMERA_SMOOTHING * dt).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
