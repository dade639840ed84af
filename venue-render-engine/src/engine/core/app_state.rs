use bevy::prelude::*;

/// The marker collection is fetched in `Loading`; everything interactive runs
/// in `Running`. A failed fetch still moves on, with an empty venue.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

pub fn log_running_state() {
    info!("→ Venue ready, entering Running state");
}
