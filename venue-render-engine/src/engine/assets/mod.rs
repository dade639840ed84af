//! Venue input data: marker records and the collection asset they load from.

/// Marker record, colour parsing, and the JSON collection asset.
pub mod marker_collection;
