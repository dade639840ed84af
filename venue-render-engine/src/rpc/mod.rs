//! JSON-RPC 2.0 bridge between the viewer and its host page.
//!
//! On the web the viewer runs inside an iframe and talks to the parent window
//! over `postMessage`. Native builds keep the same queues but only log the
//! outgoing traffic.
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Viewer (iframe)
//!        │                                     │
//!        ├─ Request (with id) ───────────────> │
//!        │ <──────────────── Response (id) ────┤
//!        │ <────────── Notification (no id) ───┤
//! ```
//!
//! ## Methods
//!
//! - `set_markers`: replace the marker collection, `{ "markers": [...] }` or a bare array
//! - `get_markers`: current collection
//! - `get_selection`: selected marker or `null`
//! - `clear_selection`: dismiss the detail popup
//! - `get_fps`: smoothed frame rate
//!
//! ## Notifications
//!
//! - `marker_click`: `{ "marker": {...}, "icon": "door-open" }`, once per secondary-click selection
//! - `selection_cleared`: `{ "id": "..." }`
//! - `fps_update`: `{ "fps": 59.8 }`, twice a second
//! - `venue_loaded`: `{ "count": 12 }`, once the first collection has resolved
//!
//! ## Error codes
//!
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// Message queues, request dispatch and the `postMessage` transport.
pub mod web_rpc;
