//! Static scene furniture: light rig, ground plane and reference grid.
//!
//! None of it follows the camera or reacts to pointer input.

/// Ground plane that receives shadows and is ignored by picking.
pub mod ground;

/// Fading reference grid built from line-list meshes.
pub mod grid;

/// Ambient fill, shadow-casting key light and accent point lights.
pub mod lighting;
