use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::marker_collection::{Marker, MarkerCollection};
use crate::markers::composer::VenueMarkers;
use crate::markers::selection::{MarkerSelection, SelectionDismissed};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// One-way message to the host page.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing queues, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Notifications queued this frame and not yet flushed.
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
                return;
            }
        }
        None => {
            error!("Window object not available, RPC bridge disabled");
            return;
        }
    }

    // JS owns the closure from here on.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message text received from the host page.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the viewer a request may inspect.
pub struct RpcContext<'a> {
    pub diagnostics: Option<&'a DiagnosticsStore>,
    pub markers: &'a [Marker],
    pub selection: Option<&'a Marker>,
}

/// Mutations a request asks for, applied by the calling system.
#[derive(Debug, Default)]
pub struct RpcEffects {
    pub replacement: Option<Vec<Marker>>,
    pub dismiss_selection: bool,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut venue: ResMut<VenueMarkers>,
    selection: Res<MarkerSelection>,
    mut dismissals: EventWriter<SelectionDismissed>,
) {
    for event in events.read() {
        let request = match parse_request(&event.content) {
            Ok(request) => request,
            Err(response) => {
                warn!("Rejected RPC message: {}", event.content);
                rpc_interface.queue_response(response);
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let mut effects = RpcEffects::default();
        let context = RpcContext {
            diagnostics: diagnostics.as_deref(),
            markers: &venue.markers,
            selection: selection.current(),
        };
        if let Some(response) = handle_rpc_request(&request, &context, &mut effects) {
            rpc_interface.queue_response(response);
        }

        if let Some(markers) = effects.replacement {
            info!("Marker collection replaced over RPC ({} markers)", markers.len());
            venue.replace_from_host(markers);
        }
        if effects.dismiss_selection {
            dismissals.write(SelectionDismissed);
        }
    }
}

/// Parse a raw message into a request, or the error response to send back.
fn parse_request(content: &str) -> Result<RpcRequest, RpcResponse> {
    let request = serde_json::from_str::<RpcRequest>(content).map_err(|e| {
        create_error_response(
            serde_json::Value::Null,
            -32600,
            "Invalid request",
            Some(serde_json::json!({ "reason": e.to_string() })),
        )
    })?;

    if request.jsonrpc != "2.0" {
        return Err(create_error_response(
            request.id.unwrap_or(serde_json::Value::Null),
            -32600,
            "Invalid request",
            Some(serde_json::json!({ "reason": "jsonrpc must be \"2.0\"" })),
        ));
    }
    Ok(request)
}

/// Dispatch one request. Effects apply to notifications too, but only
/// requests with an id produce a response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    effects: &mut RpcEffects,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "set_markers" => handle_set_markers(&request.params, effects),
        "get_markers" => handle_get_markers(context),
        "get_selection" => handle_get_selection(context),
        "clear_selection" => handle_clear_selection(context, effects),
        "get_fps" => handle_get_fps(context.diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn handle_set_markers(
    params: &serde_json::Value,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    let collection = MarkerCollection::from_json_value(params.clone())
        .map_err(|e| RpcError::invalid_params(&format!("Expected a marker list: {e}")))?;

    let count = collection.markers.len();
    effects.replacement = Some(collection.markers);
    Ok(serde_json::json!({
        "success": true,
        "count": count
    }))
}

fn handle_get_markers(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(context.markers)
        .map(|markers| serde_json::json!({ "markers": markers }))
        .map_err(|e| RpcError::internal_error(&e.to_string()))
}

fn handle_get_selection(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({ "selection": context.selection }))
}

fn handle_clear_selection(
    context: &RpcContext,
    effects: &mut RpcEffects,
) -> Result<serde_json::Value, RpcError> {
    effects.dismiss_selection = true;
    Ok(serde_json::json!({
        "success": true,
        "cleared": context.selection.map(|marker| marker.id.clone())
    }))
}

fn handle_get_fps(diagnostics: Option<&DiagnosticsStore>) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .and_then(|store| store.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Flush queued notifications, then responses.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = window() {
            if let Some(parent) = window.parent().ok().flatten() {
                if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                    error!("Failed to send message to parent: {:?}", e);
                }
            } else {
                warn!("No parent window available for message transmission");
            }
        } else {
            error!("Window object not available");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    debug!("rpc -> {}", json);
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(method: &str, params: serde_json::Value, id: Option<i64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: id.map(|id| json!(id)),
        }
    }

    const NO_MARKERS: &[Marker] = &[];

    fn empty_context() -> RpcContext<'static> {
        RpcContext {
            diagnostics: None,
            markers: NO_MARKERS,
            selection: None,
        }
    }

    #[test]
    fn set_markers_accepts_wrapped_and_bare_lists() {
        let marker = json!({
            "id": "e1", "type": "entrance", "position": [0, 0, 0], "name": "Main Gate"
        });
        for params in [json!({ "markers": [marker.clone()] }), json!([marker])] {
            let mut effects = RpcEffects::default();
            let call = request("set_markers", params, Some(1));
            let response = handle_rpc_request(&call, &empty_context(), &mut effects).unwrap();
            assert_eq!(response.result.unwrap()["count"], 1);
            assert_eq!(effects.replacement.unwrap()[0].name, "Main Gate");
        }
    }

    #[test]
    fn set_markers_rejects_malformed_params() {
        let mut effects = RpcEffects::default();
        let response = handle_rpc_request(
            &request("set_markers", json!({"markers": "nope"}), Some(2)),
            &empty_context(),
            &mut effects,
        )
        .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
        assert!(effects.replacement.is_none());
    }

    #[test]
    fn unknown_method_reports_not_found() {
        let mut effects = RpcEffects::default();
        let call = request("launch", json!({}), Some(3));
        let response = handle_rpc_request(&call, &empty_context(), &mut effects).unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn notifications_apply_effects_without_response() {
        let mut effects = RpcEffects::default();
        let call = request("clear_selection", json!(null), None);
        let response = handle_rpc_request(&call, &empty_context(), &mut effects);
        assert!(response.is_none());
        assert!(effects.dismiss_selection);
    }

    #[test]
    fn get_selection_reports_current_marker() {
        let gate = Marker::new("e1", "entrance", Vec3::ZERO, "Main Gate");
        let context = RpcContext {
            diagnostics: None,
            markers: std::slice::from_ref(&gate),
            selection: Some(&gate),
        };
        let mut effects = RpcEffects::default();
        let selected = request("get_selection", json!(null), Some(4));
        let response = handle_rpc_request(&selected, &context, &mut effects).unwrap();
        assert_eq!(response.result.unwrap()["selection"]["name"], "Main Gate");

        let empty = request("get_selection", json!(null), Some(5));
        let response = handle_rpc_request(&empty, &empty_context(), &mut effects).unwrap();
        assert!(response.result.unwrap()["selection"].is_null());
    }

    #[test]
    fn malformed_messages_are_invalid_requests() {
        let response = parse_request("{not json").unwrap_err();
        assert_eq!(response.error.unwrap().code, -32600);

        let response = parse_request(r#"{"jsonrpc":"1.0","method":"get_fps","id":7}"#).unwrap_err();
        assert_eq!(response.id, Some(json!(7)));
    }

    #[test]
    fn set_markers_message_replaces_the_venue() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<WebRpcInterface>()
            .init_resource::<VenueMarkers>()
            .init_resource::<MarkerSelection>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<SelectionDismissed>()
            .add_systems(Update, handle_rpc_messages);

        app.world_mut().send_event(IncomingRpcMessage {
            content: json!({
                "jsonrpc": "2.0",
                "method": "set_markers",
                "params": [{
                    "id": "s1", "type": "stage", "position": [0, 0, 0], "name": "Main Stage"
                }],
                "id": 1
            })
            .to_string(),
        });
        app.update();

        let venue = app.world().resource::<VenueMarkers>();
        assert_eq!(venue.markers.len(), 1);
        assert_eq!(venue.markers[0].id.as_str(), "s1");
        assert!(venue.host_supplied);
        let rpc = app.world().resource::<WebRpcInterface>();
        assert_eq!(rpc.outgoing_responses.len(), 1);
        assert!(rpc.outgoing_responses[0].error.is_none());
    }
}
