use super::validation::{ChannelMap, RestoredState, channel_map, validate_parameters, validate_system};
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::{Channel, ParameterSet};
use crate::error::ImportValidationError;
use constants::persistence::STATE_FORMAT_VERSION;
use serde::{Deserialize, Serialize};

/// Last session, as written to local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub version: u32,
    pub system: String,
    pub geometry: f64,
    pub parameters: ChannelMap,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl SavedState {
    pub fn capture(params: &ParameterSet, identity: EngineIdentity, timestamp: u64) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            system: identity.name().to_string(),
            geometry: params.get(Channel::Geometry) as f64,
            parameters: channel_map(params),
            timestamp,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ImportValidationError> {
        serde_json::from_str(json).map_err(|e| ImportValidationError::Malformed(e.to_string()))
    }

    /// The top-level `geometry` field wins over any copy inside `parameters`.
    pub fn restore(&self) -> Result<RestoredState, ImportValidationError> {
        if self.version != STATE_FORMAT_VERSION {
            return Err(ImportValidationError::UnsupportedVersion {
                document: "state",
                found: self.version,
            });
        }
        let identity = validate_system(&self.system, "state")?;
        let mut entries = self.parameters.clone();
        entries.insert(Channel::Geometry.as_str().to_string(), self.geometry);
        let parameters = validate_parameters(&entries, "state")?;
        Ok(RestoredState { identity, parameters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parameters::ParameterStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn snapshots_round_trip_through_storage_unchanged() {
        let mut store = ParameterStore::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..25 {
            store.randomize(&mut rng);
            let snapshot = store.snapshot();
            let json = SavedState::capture(&snapshot, EngineIdentity::Layered, 1_700_000_000_000)
                .to_json()
                .unwrap();
            let restored = SavedState::from_json(&json).unwrap().restore().unwrap();
            assert_eq!(restored.identity, EngineIdentity::Layered);

            let mut target = ParameterStore::default();
            target.replace(&restored.parameters);
            assert_eq!(target.snapshot(), snapshot);
        }
    }

    #[test]
    fn restore_clamps_like_any_other_write() {
        let json = r#"{"version":1,"system":"B","geometry":3,"parameters":{"hue":720,"speed":-4},"timestamp":0}"#;
        let restored = SavedState::from_json(json).unwrap().restore().unwrap();
        assert_eq!(restored.parameters.get(Channel::Hue), 0.0);
        assert_eq!(restored.parameters.get(Channel::Speed), 0.1);
        assert_eq!(restored.parameters.get(Channel::Geometry), 3.0);
        assert_eq!(restored.identity, EngineIdentity::Faceted);
    }

    #[test]
    fn future_versions_are_refused() {
        let json = r#"{"version":9,"system":"A","geometry":0,"parameters":{},"timestamp":0}"#;
        assert!(matches!(
            SavedState::from_json(json).unwrap().restore(),
            Err(ImportValidationError::UnsupportedVersion { found: 9, .. })
        ));
        assert!(matches!(
            SavedState::from_json("{not json"),
            Err(ImportValidationError::Malformed(_))
        ));
    }
}
