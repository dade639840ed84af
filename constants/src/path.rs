/// Marker collection loaded at startup, relative to the asset root.
pub const DEFAULT_MARKERS_PATH: &str = "venues/demo.markers.json";

/// Native-only override for the startup marker collection path.
pub const MARKERS_PATH_ENV: &str = "VENUE_MARKERS";

/// File extension registered with the JSON asset loader.
pub const MARKERS_EXTENSION: &str = "markers.json";
