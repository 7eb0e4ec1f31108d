use super::validation::{ChannelMap, channel_map, validate_parameters, validate_system};
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::ParameterSet;
use crate::error::ImportValidationError;
use bevy::prelude::*;
use constants::persistence::{COLLECTION_FORMAT_VERSION, COLLECTION_TYPE_TAG};
use serde::{Deserialize, Serialize};

/// Bulk export/import format. Also loaded as the preset asset.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath)]
pub struct CollectionDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub variations: Vec<VariationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationEntry {
    pub name: String,
    pub system: String,
    pub parameters: ChannelMap,
}

/// A validated, ready-to-apply variation.
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    pub name: String,
    pub identity: EngineIdentity,
    pub parameters: ParameterSet,
}

impl CollectionDocument {
    pub fn from_json(json: &str) -> Result<Self, ImportValidationError> {
        serde_json::from_str(json).map_err(|e| ImportValidationError::Malformed(e.to_string()))
    }

    pub fn from_variations<'a>(variations: impl IntoIterator<Item = &'a Variation>) -> Self {
        Self {
            kind: COLLECTION_TYPE_TAG.to_string(),
            version: COLLECTION_FORMAT_VERSION,
            variations: variations
                .into_iter()
                .map(|v| VariationEntry {
                    name: v.name.clone(),
                    system: v.identity.name().to_string(),
                    parameters: channel_map(&v.parameters),
                })
                .collect(),
        }
    }

    /// All variations or the first failure; never a partial list.
    pub fn validate(&self) -> Result<Vec<Variation>, ImportValidationError> {
        if self.kind != COLLECTION_TYPE_TAG {
            return Err(ImportValidationError::UnsupportedType {
                found: self.kind.clone(),
            });
        }
        if self.version != COLLECTION_FORMAT_VERSION {
            return Err(ImportValidationError::UnsupportedVersion {
                document: "collection",
                found: self.version,
            });
        }
        self.variations
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let location = format!("variations[{}] '{}'", i, entry.name);
                Ok(Variation {
                    name: entry.name.clone(),
                    identity: validate_system(&entry.system, &location)?,
                    parameters: validate_parameters(&entry.parameters, &location)?,
                })
            })
            .collect()
    }
}

/// In-memory list of validated variations (presets plus user imports).
#[derive(Resource, Debug, Default)]
pub struct CollectionLibrary {
    variations: Vec<Variation>,
}

impl CollectionLibrary {
    /// Returns how many variations were added. A failing document adds none.
    pub fn import(&mut self, document: &CollectionDocument) -> Result<usize, ImportValidationError> {
        let validated = document.validate()?;
        let added = validated.len();
        self.variations.extend(validated);
        Ok(added)
    }

    pub fn import_json(&mut self, json: &str) -> Result<usize, ImportValidationError> {
        self.import(&CollectionDocument::from_json(json)?)
    }

    pub fn export(&self) -> CollectionDocument {
        CollectionDocument::from_variations(&self.variations)
    }

    pub fn get(&self, index: usize) -> Option<&Variation> {
        self.variations.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variation> {
        self.variations.iter()
    }

    pub fn len(&self) -> usize {
        self.variations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parameters::Channel;

    const TWO_VARIATIONS: &str = r#"{
        "type": "hypercube-collection",
        "version": 1,
        "variations": [
            {"name": "calm", "system": "A", "parameters": {"geometry": 1, "hue": 180}},
            {"name": "storm", "system": "layered", "parameters": {"geometry": 20, "chaos": 0.9}}
        ]
    }"#;

    #[test]
    fn valid_documents_import_every_variation() {
        let mut library = CollectionLibrary::default();
        assert_eq!(library.import_json(TWO_VARIATIONS), Ok(2));
        let storm = library.find("storm").unwrap();
        assert_eq!(storm.identity, EngineIdentity::Layered);
        assert_eq!(storm.parameters.get(Channel::Geometry), 20.0);
        assert_eq!(storm.parameters.get(Channel::Hue), Channel::Hue.default_value());
    }

    #[test]
    fn one_bad_geometry_rejects_the_whole_document() {
        let mut library = CollectionLibrary::default();
        let bad = TWO_VARIATIONS.replace(r#""geometry": 20"#, r#""geometry": 999"#);
        let err = library.import_json(&bad).unwrap_err();
        assert!(matches!(err, ImportValidationError::InvalidGeometry { value, .. } if value == 999.0));
        assert!(err.to_string().contains("storm"));
        assert!(library.is_empty());
    }

    #[test]
    fn wrong_tag_is_rejected() {
        let bad = TWO_VARIATIONS.replace("hypercube-collection", "playlist");
        assert!(matches!(
            CollectionDocument::from_json(&bad).unwrap().validate(),
            Err(ImportValidationError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn export_reimports_to_the_same_variations() {
        let mut library = CollectionLibrary::default();
        library.import_json(TWO_VARIATIONS).unwrap();
        let json = serde_json::to_string(&library.export()).unwrap();
        assert!(json.contains(r#""type":"hypercube-collection""#));

        let mut copy = CollectionLibrary::default();
        copy.import_json(&json).unwrap();
        assert_eq!(copy.iter().collect::<Vec<_>>(), library.iter().collect::<Vec<_>>());
    }
}
