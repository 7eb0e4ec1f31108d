use crate::engine::adapters::AudioLevels;
use crate::engine::catalog::GeometryCatalog;
use crate::engine::coordinator::{EngineCoordinator, EngineIdentity};
use crate::engine::parameters::{ParameterPatch, ParameterStore, SessionRng};
use crate::engine::systems::engine_switch::{EngineSwitchEvent, SwitchSource};
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::systems::keyboard::reset_for_current_geometry;
use crate::error::{EngineError, ImportValidationError, InteractionError, ParameterError};
use crate::interaction::InteractionRouter;
use crate::interaction::input::TiltReading;
use crate::persistence::collection::{CollectionDocument, CollectionLibrary, Variation};
use crate::persistence::share_code::{decode_share_code, encode_share_code};
use crate::persistence::state_sync::persist_collection;
use crate::persistence::storage::StateStorage;
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::geometry::CORE_NAMES;
use constants::persistence::SHARE_QUERY_PARAM;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

const JSONRPC_VERSION: &str = "2.0";

const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

/// Without an `id` the message is a host notification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// Carries either `result` or `error`, never both.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

impl RpcResponse {
    fn from_outcome(id: Value, outcome: RpcOutcome) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error)),
        };
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result,
            error,
            id: Some(id),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            data: Some(json!({ "method": method })),
            ..Self::new(METHOD_NOT_FOUND, "Method not found")
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl From<ParameterError> for RpcError {
    fn from(e: ParameterError) -> Self {
        Self::invalid_params(e.to_string())
    }
}

impl From<InteractionError> for RpcError {
    fn from(e: InteractionError) -> Self {
        Self::invalid_params(e.to_string())
    }
}

/// Documents and share codes come from the host, so a rejection is the caller's fault.
impl From<ImportValidationError> for RpcError {
    fn from(e: ImportValidationError) -> Self {
        Self::invalid_params(e.to_string())
    }
}

impl From<EngineError> for RpcError {
    fn from(e: EngineError) -> Self {
        match &e {
            EngineError::UnknownEngine(_) => Self::invalid_params(e.to_string()),
            EngineError::ResourceUnavailable { .. } | EngineError::Geometry(_) => {
                Self::internal_error(e.to_string())
            }
        }
    }
}

type RpcOutcome = Result<Value, RpcError>;

/// Methods the host may call with an `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RpcMethod {
    SetParameters,
    GetParameters,
    SwitchEngine,
    SelectMode,
    Randomize,
    Reset,
    ImportCollection,
    ExportCollection,
    ApplyVariation,
    GetShareCode,
    ApplyShareCode,
    GetGeometryCatalog,
    GetFps,
}

impl RpcMethod {
    const ALL: [RpcMethod; 13] = [
        RpcMethod::SetParameters,
        RpcMethod::GetParameters,
        RpcMethod::SwitchEngine,
        RpcMethod::SelectMode,
        RpcMethod::Randomize,
        RpcMethod::Reset,
        RpcMethod::ImportCollection,
        RpcMethod::ExportCollection,
        RpcMethod::ApplyVariation,
        RpcMethod::GetShareCode,
        RpcMethod::ApplyShareCode,
        RpcMethod::GetGeometryCatalog,
        RpcMethod::GetFps,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::SetParameters => "set_parameters",
            Self::GetParameters => "get_parameters",
            Self::SwitchEngine => "switch_engine",
            Self::SelectMode => "select_mode",
            Self::Randomize => "randomize",
            Self::Reset => "reset",
            Self::ImportCollection => "import_collection",
            Self::ExportCollection => "export_collection",
            Self::ApplyVariation => "apply_variation",
            Self::GetShareCode => "get_share_code",
            Self::ApplyShareCode => "apply_share_code",
            Self::GetGeometryCatalog => "get_geometry_catalog",
            Self::GetFps => "get_fps",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }
}

/// Streams the host pushes without expecting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostNotification {
    Tilt,
    AudioLevels,
}

impl HostNotification {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "tilt" => Some(Self::Tilt),
            "audio_levels" => Some(Self::AudioLevels),
            _ => None,
        }
    }
}

/// Responses and notifications leave in the order they were queued.
#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
enum OutgoingMessage {
    Response(RpcResponse),
    Notification(RpcNotification),
}

#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing: Vec<OutgoingMessage>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing.push(OutgoingMessage::Notification(RpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        }));
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing.push(OutgoingMessage::Response(response));
    }
}

/// Bridges `postMessage` traffic from the parent window into the ECS.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<InboundMessages>()
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

/// Raw message strings written by the browser listener, drained once per frame.
#[derive(Resource, Default, Clone)]
struct InboundMessages(Arc<Mutex<Vec<String>>>);

impl InboundMessages {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn push(&self, message: String) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message);
        }
    }

    fn drain(&self) -> Vec<String> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(inbound: Res<InboundMessages>) {
    let inbound = inbound.clone();
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message: String = data.into();
            if message.contains("jsonrpc") {
                inbound.push(message);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // The listener lives as long as the page.
    closure.forget();
}

#[derive(Event)]
struct IncomingRpcMessage {
    request: RpcRequest,
}

fn process_incoming_messages(
    inbound: Res<InboundMessages>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    for message in inbound.drain() {
        match serde_json::from_str::<RpcRequest>(&message) {
            Ok(request) => {
                message_events.write(IncomingRpcMessage { request });
            }
            Err(e) => warn!("Unparseable RPC message: {}", e),
        }
    }
}

/// Everything an RPC method may read or write.
#[derive(SystemParam)]
struct RpcContext<'w> {
    rpc: ResMut<'w, WebRpcInterface>,
    store: ResMut<'w, ParameterStore>,
    router: ResMut<'w, InteractionRouter>,
    coordinator: ResMut<'w, EngineCoordinator>,
    library: ResMut<'w, CollectionLibrary>,
    storage: ResMut<'w, StateStorage>,
    rng: ResMut<'w, SessionRng>,
    catalog: Res<'w, GeometryCatalog>,
    diagnostics: Res<'w, DiagnosticsStore>,
    switches: EventWriter<'w, EngineSwitchEvent>,
    tilt_readings: EventWriter<'w, TiltReading>,
}

fn handle_rpc_messages(mut events: EventReader<IncomingRpcMessage>, mut ctx: RpcContext) {
    for event in events.read() {
        debug!("Processing RPC method: {}", event.request.method);
        if let Some(response) = handle_rpc_request(&event.request, &mut ctx) {
            ctx.rpc.queue_response(response);
        }
    }
}

fn handle_rpc_request(request: &RpcRequest, ctx: &mut RpcContext) -> Option<RpcResponse> {
    let Some(id) = request.id.clone() else {
        handle_host_notification(request, ctx);
        return None;
    };

    let outcome = if request.jsonrpc != JSONRPC_VERSION {
        Err(RpcError::invalid_request(format!(
            "Unsupported jsonrpc version '{}'",
            request.jsonrpc
        )))
    } else {
        match RpcMethod::from_name(&request.method) {
            Some(method) => dispatch(method, &request.params, ctx),
            None => {
                warn!("Unknown RPC method: {}", request.method);
                Err(RpcError::method_not_found(&request.method))
            }
        }
    };
    Some(RpcResponse::from_outcome(id, outcome))
}

fn dispatch(method: RpcMethod, params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    match method {
        RpcMethod::SetParameters => set_parameters(params, ctx),
        RpcMethod::GetParameters => Ok(parameters_payload(&ctx.store)),
        RpcMethod::SwitchEngine => switch_engine(params, ctx),
        RpcMethod::SelectMode => select_mode(params, ctx),
        RpcMethod::Randomize => {
            ctx.store.randomize(&mut ctx.rng.0);
            Ok(parameters_payload(&ctx.store))
        }
        RpcMethod::Reset => {
            reset_for_current_geometry(&mut ctx.store, &ctx.catalog);
            Ok(parameters_payload(&ctx.store))
        }
        RpcMethod::ImportCollection => import_collection(params, ctx),
        RpcMethod::ExportCollection => {
            serde_json::to_value(ctx.library.export()).map_err(|e| RpcError::internal_error(e.to_string()))
        }
        RpcMethod::ApplyVariation => apply_variation(params, ctx),
        RpcMethod::GetShareCode => get_share_code(ctx),
        RpcMethod::ApplyShareCode => apply_share_code(params, ctx),
        RpcMethod::GetGeometryCatalog => get_geometry_catalog(ctx),
        RpcMethod::GetFps => Ok(json!({
            "fps": current_fps(&ctx.diagnostics).unwrap_or(0.0)
        })),
    }
}

fn handle_host_notification(request: &RpcRequest, ctx: &mut RpcContext) {
    let Some(kind) = HostNotification::from_name(&request.method) else {
        warn!("Unknown RPC notification: {}", request.method);
        return;
    };
    match kind {
        HostNotification::Tilt => {
            #[derive(Deserialize)]
            struct TiltParams {
                alpha: f32,
                beta: f32,
                gamma: f32,
            }
            match parse_params::<TiltParams>(&request.params, "Expected 'alpha', 'beta', 'gamma'") {
                Ok(p) => {
                    ctx.tilt_readings.write(TiltReading {
                        alpha: p.alpha,
                        beta: p.beta,
                        gamma: p.gamma,
                    });
                }
                Err(e) => warn!("Ignoring tilt notification: {}", e.message),
            }
        }
        HostNotification::AudioLevels => {
            match parse_params::<AudioLevels>(&request.params, "Expected 'bass', 'mid', 'high'") {
                Ok(levels) => ctx.coordinator.feed_audio(levels),
                Err(e) => warn!("Ignoring audio levels: {}", e.message),
            }
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: &Value, expected: &str) -> Result<T, RpcError> {
    serde_json::from_value::<T>(params.clone()).map_err(|_| RpcError::invalid_params(expected))
}

fn parameters_payload(store: &ParameterStore) -> Value {
    json!({
        "parameters": store.snapshot().to_named_map(),
        "version": store.version(),
    })
}

/// Partial update; every value goes through the clamping path in one batch.
fn set_parameters(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct SetParams {
        parameters: BTreeMap<String, f32>,
    }

    let parsed = parse_params::<SetParams>(params, "Expected 'parameters' object")?;
    let patch = ParameterPatch::from_named(parsed.parameters.iter().map(|(k, v)| (k.as_str(), *v)))?;
    let changed = ctx.store.set_many(&patch);

    let mut payload = parameters_payload(&ctx.store);
    payload["changed"] = json!(changed);
    Ok(payload)
}

fn request_switch(ctx: &mut RpcContext, identity: EngineIdentity) {
    ctx.switches.write(EngineSwitchEvent {
        name: identity.name().to_string(),
        source: SwitchSource::Rpc,
    });
}

/// The switch itself runs in the engine switch system; its outcome arrives as
/// an `engine_changed` or `engine_switch_failed` notification.
fn switch_engine(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct SwitchParams {
        engine: String,
    }

    let parsed = parse_params::<SwitchParams>(params, "Expected 'engine' parameter")?;
    let identity = EngineIdentity::from_string(&parsed.engine)
        .ok_or_else(|| EngineError::UnknownEngine(parsed.engine.clone()))?;
    request_switch(ctx, identity);
    info!("Engine switch requested: {:?}", identity);

    Ok(json!({
        "success": true,
        "engine": identity.name(),
        "already_active": ctx.coordinator.active_identity() == Some(identity),
    }))
}

fn select_mode(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct ModeParams {
        category: String,
        mode: String,
    }

    let parsed = parse_params::<ModeParams>(params, "Expected 'category' and 'mode'")?;
    let changed = ctx
        .router
        .select_mode(&parsed.category, &parsed.mode, &mut ctx.store)?;

    let payload = json!({
        "category": parsed.category,
        "mode": parsed.mode,
        "changed": changed,
    });
    if changed {
        ctx.rpc.send_notification("mode_changed", payload.clone());
    }
    Ok(payload)
}

/// Accepts `{document: {...}}` or `{json: "..."}`. A rejected document adds nothing.
fn import_collection(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct ImportParams {
        document: Option<CollectionDocument>,
        json: Option<String>,
    }

    let parsed = parse_params::<ImportParams>(params, "Expected 'document' or 'json'")?;
    let imported = match (parsed.document, parsed.json) {
        (Some(document), _) => ctx.library.import(&document)?,
        (None, Some(json)) => ctx.library.import_json(&json)?,
        (None, None) => return Err(RpcError::invalid_params("Expected 'document' or 'json'")),
    };

    if let Err(e) = persist_collection(ctx.storage.0.as_mut(), &ctx.library) {
        warn!("Collection not saved: {}", e);
    }

    Ok(json!({
        "imported": imported,
        "total": ctx.library.len(),
    }))
}

fn apply_variation(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct VariationParams {
        index: Option<usize>,
        name: Option<String>,
    }

    let parsed = parse_params::<VariationParams>(params, "Expected 'index' or 'name'")?;
    let variation: Variation = match (parsed.index, parsed.name.as_deref()) {
        (Some(index), _) => ctx.library.get(index),
        (None, Some(name)) => ctx.library.find(name),
        (None, None) => return Err(RpcError::invalid_params("Expected 'index' or 'name'")),
    }
    .cloned()
    .ok_or_else(|| RpcError::invalid_params("No such variation"))?;

    ctx.store.replace(&variation.parameters);
    request_switch(ctx, variation.identity);

    Ok(json!({
        "name": variation.name,
        "engine": variation.identity.name(),
    }))
}

fn get_share_code(ctx: &mut RpcContext) -> RpcOutcome {
    let identity = ctx
        .coordinator
        .active_identity()
        .unwrap_or(EngineIdentity::Volumetric);
    // Encoding our own snapshot can only fail on a serializer fault.
    let code = encode_share_code(&ctx.store.snapshot(), identity)
        .map_err(|e| RpcError::internal_error(e.to_string()))?;

    Ok(json!({
        "query": format!("?{}={}", SHARE_QUERY_PARAM, code),
        "code": code,
    }))
}

fn apply_share_code(params: &Value, ctx: &mut RpcContext) -> RpcOutcome {
    #[derive(Deserialize)]
    struct ShareParams {
        code: String,
    }

    let parsed = parse_params::<ShareParams>(params, "Expected 'code' parameter")?;
    let restored = decode_share_code(&parsed.code)?;
    ctx.store.replace(&restored.parameters);
    request_switch(ctx, restored.identity);

    let mut payload = parameters_payload(&ctx.store);
    payload["engine"] = json!(restored.identity.name());
    Ok(payload)
}

fn get_geometry_catalog(ctx: &mut RpcContext) -> RpcOutcome {
    let codec = ctx.catalog.codec();
    let current = ctx.store.snapshot().geometry_index();
    let decoded = codec.decode_index(current).map_err(EngineError::from)?;

    Ok(json!({
        "total": codec.total(),
        "bases": ctx.catalog.descriptors(),
        "cores": CORE_NAMES,
        "current": {
            "index": current.value(),
            "base": decoded.base_index,
            "core": decoded.core_index,
        },
        "cache": ctx.catalog.cache_stats(),
    }))
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for message in rpc_interface.outgoing.drain(..) {
        send_message_to_parent(&message);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize message: {}", e);
                return;
            }
        };
        let Some(window) = window() else {
            error!("Window object not available");
            return;
        };
        match window.parent().ok().flatten() {
            Some(parent) => {
                if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                    error!("Failed to send message to parent: {:?}", e);
                }
            }
            None => warn!("No parent window available for message transmission"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::adapters::StandardAdapterFactory;
    use crate::engine::parameters::Channel;
    use bevy::ecs::event::Events;
    use bevy::ecs::system::SystemState;

    fn world() -> World {
        let mut world = World::new();
        let catalog = GeometryCatalog::default();
        world.insert_resource(EngineCoordinator::new(Box::new(StandardAdapterFactory::new(
            catalog.0.clone(),
        ))));
        world.insert_resource(catalog);
        world.init_resource::<WebRpcInterface>();
        world.init_resource::<ParameterStore>();
        world.init_resource::<InteractionRouter>();
        world.init_resource::<CollectionLibrary>();
        world.init_resource::<StateStorage>();
        world.init_resource::<SessionRng>();
        world.init_resource::<DiagnosticsStore>();
        world.init_resource::<Events<EngineSwitchEvent>>();
        world.init_resource::<Events<TiltReading>>();
        world
    }

    fn call(world: &mut World, json: &str) -> Option<RpcResponse> {
        let request: RpcRequest = serde_json::from_str(json).unwrap();
        let mut state = SystemState::<RpcContext>::new(world);
        let response = {
            let mut ctx = state.get_mut(world);
            handle_rpc_request(&request, &mut ctx)
        };
        state.apply(world);
        response
    }

    fn result(response: Option<RpcResponse>) -> Value {
        let response = response.unwrap();
        assert!(response.error.is_none(), "{:?}", response.error);
        response.result.unwrap()
    }

    fn error_code(response: Option<RpcResponse>) -> i32 {
        response.unwrap().error.unwrap().code
    }

    fn notifications(world: &World, method: &str) -> usize {
        world
            .resource::<WebRpcInterface>()
            .outgoing
            .iter()
            .filter(|m| matches!(m, OutgoingMessage::Notification(n) if n.method == method))
            .count()
    }

    #[test]
    fn every_method_name_parses_back() {
        for method in RpcMethod::ALL {
            assert_eq!(RpcMethod::from_name(method.name()), Some(method));
        }
        assert_eq!(RpcMethod::from_name("tilt"), None);
        assert_eq!(HostNotification::from_name("tilt"), Some(HostNotification::Tilt));
    }

    #[test]
    fn domain_errors_map_to_json_rpc_codes() {
        assert_eq!(RpcError::from(ParameterError::UnknownChannel("glow".into())).code, INVALID_PARAMS);
        assert_eq!(RpcError::from(EngineError::UnknownEngine("Z".into())).code, INVALID_PARAMS);
        let busy = EngineError::ResourceUnavailable {
            engine: "A",
            reason: "no context".into(),
        };
        assert_eq!(RpcError::from(busy).code, INTERNAL_ERROR);
        let bad_doc = ImportValidationError::UnsupportedType { found: "x".into() };
        assert_eq!(RpcError::from(bad_doc).code, INVALID_PARAMS);
    }

    #[test]
    fn set_parameters_clamps_in_one_batch() {
        let mut world = world();
        let value = result(call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"set_parameters","params":{"parameters":{"hue":900,"chaos":0.5}},"id":1}"#,
        ));
        assert_eq!(value["changed"], true);
        assert_eq!(value["version"], 1);
        let store = world.resource::<ParameterStore>();
        assert_eq!(store.value(Channel::Hue), 180.0);
        assert_eq!(store.value(Channel::Chaos), 0.5);
    }

    #[test]
    fn unknown_channels_and_methods_are_errors() {
        let mut world = world();
        let bad_channel = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"set_parameters","params":{"parameters":{"glow":1}},"id":1}"#,
        );
        assert_eq!(error_code(bad_channel), INVALID_PARAMS);
        assert_eq!(world.resource::<ParameterStore>().version(), 0);

        let missing = call(&mut world, r#"{"jsonrpc":"2.0","method":"warp_drive","id":2}"#).unwrap();
        let error = missing.error.unwrap();
        assert_eq!(error.code, METHOD_NOT_FOUND);
        assert_eq!(error.data, Some(json!({ "method": "warp_drive" })));
    }

    #[test]
    fn wrong_protocol_version_is_an_invalid_request() {
        let mut world = world();
        let response = call(&mut world, r#"{"jsonrpc":"1.0","method":"randomize","id":1}"#);
        assert_eq!(error_code(response), INVALID_REQUEST);
        assert_eq!(world.resource::<ParameterStore>().version(), 0);
    }

    #[test]
    fn responses_omit_the_unused_member() {
        let mut world = world();
        let response = call(&mut world, r#"{"jsonrpc":"2.0","method":"get_fps","id":7}"#).unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert!(wire.get("error").is_none());
        assert_eq!(wire["id"], 7);
        assert_eq!(wire["result"]["fps"], 0.0);
    }

    #[test]
    fn switch_engine_validates_before_dispatching() {
        let mut world = world();
        let unknown = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"switch_engine","params":{"engine":"Z"},"id":1}"#,
        );
        assert_eq!(error_code(unknown), INVALID_PARAMS);
        assert!(world.resource::<Events<EngineSwitchEvent>>().is_empty());

        let ok = result(call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"switch_engine","params":{"engine":"faceted"},"id":2}"#,
        ));
        assert_eq!(ok["engine"], "B");
        assert_eq!(world.resource::<Events<EngineSwitchEvent>>().len(), 1);
    }

    #[test]
    fn mode_changes_are_announced_once() {
        let mut world = world();
        let request = r#"{"jsonrpc":"2.0","method":"select_mode","params":{"category":"click","mode":"ripple"},"id":1}"#;
        assert_eq!(result(call(&mut world, request))["changed"], true);
        assert_eq!(result(call(&mut world, request))["changed"], false);
        assert_eq!(notifications(&world, "mode_changed"), 1);

        let bad = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"select_mode","params":{"category":"click","mode":"explode"},"id":2}"#,
        );
        assert_eq!(error_code(bad), INVALID_PARAMS);
    }

    #[test]
    fn rejected_collections_leave_the_library_untouched() {
        let mut world = world();
        let bad = r#"{"jsonrpc":"2.0","method":"import_collection","params":{"document":{"type":"hypercube-collection","version":1,"variations":[{"name":"ok","system":"A","parameters":{}},{"name":"bad","system":"A","parameters":{"geometry":99}}]}},"id":1}"#;
        assert_eq!(error_code(call(&mut world, bad)), INVALID_PARAMS);
        assert!(world.resource::<CollectionLibrary>().is_empty());

        let good = bad.replace(r#""geometry":99"#, r#""geometry":9"#);
        assert_eq!(result(call(&mut world, &good))["imported"], 2);

        let applied = result(call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"apply_variation","params":{"name":"bad"},"id":2}"#,
        ));
        assert_eq!(applied["engine"], "A");
        assert_eq!(world.resource::<ParameterStore>().value(Channel::Geometry), 9.0);
    }

    #[test]
    fn share_codes_round_trip_over_rpc() {
        let mut world = world();
        world.resource_mut::<ParameterStore>().set(Channel::Speed, 2.5);
        let shared = result(call(&mut world, r#"{"jsonrpc":"2.0","method":"get_share_code","id":1}"#));
        let code = shared["code"].as_str().unwrap().to_string();

        world.resource_mut::<ParameterStore>().set(Channel::Speed, 0.5);
        let request = json!({
            "jsonrpc": "2.0",
            "method": "apply_share_code",
            "params": {"code": code},
            "id": 2,
        });
        result(call(&mut world, &request.to_string()));
        assert_eq!(world.resource::<ParameterStore>().value(Channel::Speed), 2.5);

        let garbage = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"apply_share_code","params":{"code":"%%%"},"id":3}"#,
        );
        assert_eq!(error_code(garbage), INVALID_PARAMS);
    }

    #[test]
    fn notifications_get_no_response() {
        let mut world = world();
        let tilt = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"tilt","params":{"alpha":10,"beta":20,"gamma":-5}}"#,
        );
        assert!(tilt.is_none());
        assert_eq!(world.resource::<Events<TiltReading>>().len(), 1);

        let audio = call(
            &mut world,
            r#"{"jsonrpc":"2.0","method":"audio_levels","params":{"bass":0.4,"mid":0.2,"high":0.9}}"#,
        );
        assert!(audio.is_none());
    }

    #[test]
    fn inbound_queue_is_drained_once() {
        let inbound = InboundMessages::default();
        inbound.push(r#"{"jsonrpc":"2.0","method":"get_fps","id":1}"#.into());
        inbound.clone().push("not json".into());
        assert_eq!(inbound.drain().len(), 2);
        assert!(inbound.drain().is_empty());
    }
}
