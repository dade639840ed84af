//! Loading the venue's marker collection.
//!
//! The collection is a `*.markers.json` asset. Once it resolves (or fails) the
//! app enters `Running`; later edits to the file are picked up by hot reload.

/// Collection handle tracking, load polling and hot-reload sync.
pub mod collection_loader;
