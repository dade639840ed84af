use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::rpc::web_rpc::WebRpcInterface;

const FPS_NOTIFICATION_INTERVAL: f32 = 0.5;

fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFICATION_INTERVAL {
        return;
    }

    if let Some(value) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification(
            "fps_update",
            serde_json::json!({
                "fps": value as f32
            }),
        );
        *last_send_time = current_time;
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}

/// Bottom-right FPS readout, native builds only.
pub fn spawn_fps_overlay(mut commands: Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(1., 0., 0.)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        Pickable::IGNORE,
        FpsText,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::diagnostic::{Diagnostic, DiagnosticMeasurement};
    use bevy::platform::time::Instant;

    #[test]
    fn overlay_shows_smoothed_fps() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DiagnosticsStore>()
            .add_systems(Update, fps_text_update_system);
        let overlay = app.world_mut().spawn((Text::new("FPS: "), FpsText)).id();

        app.update();
        assert_eq!(app.world().get::<Text>(overlay).unwrap().0, "FPS: ");

        let mut fps = Diagnostic::new(FrameTimeDiagnosticsPlugin::FPS);
        fps.add_measurement(DiagnosticMeasurement {
            time: Instant::now(),
            value: 60.0,
        });
        app.world_mut().resource_mut::<DiagnosticsStore>().add(fps);
        app.update();

        assert_eq!(app.world().get::<Text>(overlay).unwrap().0, "FPS: 60.0");
    }
}
