//! Orbit camera for navigating the venue floor plan.
//!
//! Primary drag orbits, middle drag pans, the wheel zooms and WASD/QE add
//! keyboard pan and yaw. The secondary button is left to marker selection.

/// Orbit rig resource, gesture mapping and the controller system.
pub mod viewport_camera;
