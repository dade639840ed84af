//! Shared tuning constants for the venue floor-plan viewer.
//!
//! Camera limits, the fixed lighting rig, grid and ground sizing, and the
//! per-marker hover presentation all live here so the engine crate never
//! hard-codes a magic number inside a system.

pub mod camera_settings;
pub mod marker_settings;
pub mod path;
pub mod scene_settings;
