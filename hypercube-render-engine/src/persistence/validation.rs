use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::{Channel, ParameterSet};
use crate::error::ImportValidationError;
use constants::parameters::ROTATION_LIMIT;
use polytope_geometry::GeometryIndexCodec;
use std::collections::BTreeMap;

/// Channel name to value, as stored in every document format.
pub type ChannelMap = BTreeMap<String, f64>;

/// Parameters and engine recovered from a validated document.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub identity: EngineIdentity,
    pub parameters: ParameterSet,
}

/// Build a full parameter set from a document's channel map.
///
/// Unknown names, non-finite values, a non-integer or out-of-range geometry and
/// rotations beyond one turn reject the whole map. Other channels are clamped
/// and absent channels take their defaults.
pub fn validate_parameters(entries: &ChannelMap, location: &str) -> Result<ParameterSet, ImportValidationError> {
    let mut set = ParameterSet::defaults();
    for (name, value) in entries {
        let channel: Channel = name.parse().map_err(|_| ImportValidationError::UnknownChannel {
            location: location.to_string(),
            channel: name.clone(),
        })?;
        if !value.is_finite() {
            return Err(ImportValidationError::NonFinite {
                location: location.to_string(),
                channel: name.clone(),
            });
        }
        if channel == Channel::Geometry {
            let total = GeometryIndexCodec::STANDARD.total();
            if value.fract() != 0.0 || *value < 0.0 || *value >= total as f64 {
                return Err(ImportValidationError::InvalidGeometry {
                    location: location.to_string(),
                    value: *value,
                    total,
                });
            }
        } else if channel.is_rotation() && value.abs() > ROTATION_LIMIT as f64 {
            return Err(ImportValidationError::RotationOutOfRange {
                location: location.to_string(),
                channel: name.clone(),
                value: *value,
                limit: ROTATION_LIMIT,
            });
        }
        let narrowed = value.clamp(f32::MIN as f64, f32::MAX as f64) as f32;
        set.set_clamped(channel, narrowed);
    }
    Ok(set)
}

pub fn validate_system(system: &str, location: &str) -> Result<EngineIdentity, ImportValidationError> {
    EngineIdentity::from_string(system).ok_or_else(|| ImportValidationError::UnknownSystem {
        location: location.to_string(),
        system: system.to_string(),
    })
}

/// Every channel, for documents that store full snapshots.
pub fn channel_map(set: &ParameterSet) -> ChannelMap {
    set.iter()
        .map(|(channel, value)| (channel.as_str().to_string(), value as f64))
        .collect()
}

/// Only channels that differ from their defaults.
pub fn changed_channel_map(set: &ParameterSet) -> ChannelMap {
    set.iter()
        .filter(|(channel, value)| *value != channel.default_value())
        .map(|(channel, value)| (channel.as_str().to_string(), value as f64))
        .collect()
}
