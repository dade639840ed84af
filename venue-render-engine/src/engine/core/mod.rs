//! Application setup and lifecycle.
//!
//! Builds the Bevy app for native and WASM targets, owns the loading/running
//! state machine and the platform window configuration.

/// App construction: plugins, resources and system scheduling.
pub mod app_setup;

/// `Loading -> Running` state machine and the FPS overlay marker.
pub mod app_state;

/// Canvas binding on the web, vsync on native.
pub mod window_config;
