use super::validation::{
    ChannelMap, RestoredState, changed_channel_map, validate_parameters, validate_system,
};
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::{Channel, ParameterSet};
use crate::error::ImportValidationError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use constants::persistence::SHARE_FORMAT_VERSION;
use serde::{Deserialize, Serialize};

/// Minified form carried in the URL: only channels that differ from defaults.
#[derive(Debug, Serialize, Deserialize)]
struct ShareDocument {
    v: u32,
    s: String,
    g: f64,
    #[serde(default)]
    p: ChannelMap,
}

pub fn encode_share_code(params: &ParameterSet, identity: EngineIdentity) -> Result<String, ImportValidationError> {
    let mut changed = changed_channel_map(params);
    changed.remove(Channel::Geometry.as_str());
    let document = ShareDocument {
        v: SHARE_FORMAT_VERSION,
        s: identity.name().to_string(),
        g: params.get(Channel::Geometry) as f64,
        p: changed,
    };
    let json = serde_json::to_vec(&document).map_err(|e| ImportValidationError::Malformed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Rejects the whole code on any problem; absent channels come back as defaults.
pub fn decode_share_code(code: &str) -> Result<RestoredState, ImportValidationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(code.trim().trim_end_matches('='))
        .map_err(|e| ImportValidationError::InvalidEncoding(e.to_string()))?;
    let document: ShareDocument =
        serde_json::from_slice(&bytes).map_err(|e| ImportValidationError::Malformed(e.to_string()))?;
    if document.v != SHARE_FORMAT_VERSION {
        return Err(ImportValidationError::UnsupportedVersion {
            document: "share code",
            found: document.v,
        });
    }
    let identity = validate_system(&document.s, "share code")?;
    let mut entries = document.p;
    entries.insert(Channel::Geometry.as_str().to_string(), document.g);
    let parameters = validate_parameters(&entries, "share code")?;
    Ok(RestoredState { identity, parameters })
}
