use super::channel::{CHANNEL_COUNT, Channel};
use crate::error::ParameterError;
use polytope_geometry::{
    GeometryIndex, GeometryIndexCodec, ProjectionParams, RotationAngles, VisualBias,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Complete value set for every channel. `Copy`, so a snapshot can never alias the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    values: [f32; CHANNEL_COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ParameterSet {
    pub fn defaults() -> Self {
        let mut values = [0.0; CHANNEL_COUNT];
        for channel in Channel::ALL {
            values[channel.index()] = channel.default_value();
        }
        Self { values }
    }

    /// Defaults with a base geometry's visual bias folded into the visual channels.
    pub fn biased_defaults(bias: VisualBias) -> Self {
        let mut set = Self::defaults();
        let scale = [
            (Channel::GridDensity, bias.density),
            (Channel::MorphFactor, bias.morph),
            (Channel::Chaos, bias.chaos),
            (Channel::Speed, bias.speed),
            (Channel::Hue, bias.hue),
        ];
        for (channel, factor) in scale {
            set.set_clamped(channel, channel.default_value() * factor);
        }
        set
    }

    pub fn get(&self, channel: Channel) -> f32 {
        self.values[channel.index()]
    }

    pub fn get_named(&self, name: &str) -> Result<f32, ParameterError> {
        Ok(self.get(name.parse()?))
    }

    /// Write through the range table. Non-finite values leave the set unchanged.
    pub fn set_clamped(&mut self, channel: Channel, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        let clamped = channel.clamp(value);
        let slot = &mut self.values[channel.index()];
        if *slot == clamped {
            return false;
        }
        *slot = clamped;
        true
    }

    /// Copy with every channel pushed through the range table.
    pub fn clamped(mut self) -> Self {
        for channel in Channel::ALL {
            let value = self.values[channel.index()];
            self.values[channel.index()] = if value.is_finite() {
                channel.clamp(value)
            } else {
                channel.default_value()
            };
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        Channel::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    pub fn geometry_index(&self) -> GeometryIndex {
        GeometryIndexCodec::STANDARD.normalize(self.get(Channel::Geometry) as i64)
    }

    pub fn rotation(&self) -> RotationAngles {
        let mut angles = RotationAngles::default();
        for channel in Channel::ROTATIONS {
            if let Some(plane) = channel.rotation_plane() {
                *angles.angle_mut(plane) = self.get(channel);
            }
        }
        angles
    }

    pub fn to_named_map(&self) -> BTreeMap<String, f32> {
        self.iter().map(|(c, v)| (c.as_str().to_string(), v)).collect()
    }
}

impl From<&ParameterSet> for ProjectionParams {
    fn from(set: &ParameterSet) -> Self {
        ProjectionParams {
            rotation: set.rotation(),
            dimension: set.get(Channel::Dimension),
        }
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CHANNEL_COUNT))?;
        for (channel, value) in self.iter() {
            map.serialize_entry(channel.as_str(), &value)?;
        }
        map.end()
    }
}

/// Partial write: a subset of channels applied together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterPatch {
    values: BTreeMap<Channel, f32>,
}

impl ParameterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, channel: Channel, value: f32) -> Self {
        self.insert(channel, value);
        self
    }

    pub fn insert(&mut self, channel: Channel, value: f32) {
        self.values.insert(channel, value);
    }

    pub fn get(&self, channel: Channel) -> Option<f32> {
        self.values.get(&channel).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }

    /// Every channel of `set`, for whole-state writes.
    pub fn from_set(set: &ParameterSet) -> Self {
        Self {
            values: set.iter().collect(),
        }
    }

    pub fn from_named<'a>(
        entries: impl IntoIterator<Item = (&'a str, f32)>,
    ) -> Result<Self, ParameterError> {
        let mut patch = Self::new();
        for (name, value) in entries {
            patch.insert(name.parse()?, value);
        }
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_range_table() {
        let set = ParameterSet::defaults();
        assert_eq!(set.get(Channel::GridDensity), 15.0);
        assert_eq!(set.get(Channel::Hue), 200.0);
        assert_eq!(set.get(Channel::Dimension), 3.5);
        assert_eq!(set.get(Channel::Rot4dZW), 0.0);
    }

    #[test]
    fn snapshot_copies_are_independent() {
        let original = ParameterSet::defaults();
        let mut copy = original;
        copy.set_clamped(Channel::Chaos, 0.9);
        assert_eq!(original.get(Channel::Chaos), 0.2);
        assert_eq!(copy.get(Channel::Chaos), 0.9);
    }

    #[test]
    fn bias_scales_visual_defaults_and_stays_in_range() {
        let bias = VisualBias {
            density: 2.0,
            morph: 10.0,
            chaos: 1.0,
            speed: 1.0,
            hue: 0.5,
        };
        let set = ParameterSet::biased_defaults(bias);
        assert_eq!(set.get(Channel::GridDensity), 30.0);
        assert_eq!(set.get(Channel::MorphFactor), 2.0);
        assert_eq!(set.get(Channel::Hue), 100.0);
    }

    #[test]
    fn serializes_as_named_map() {
        let value = serde_json::to_value(ParameterSet::defaults()).unwrap();
        assert_eq!(value["gridDensity"], 15.0);
        assert_eq!(value.as_object().unwrap().len(), CHANNEL_COUNT);
    }

    #[test]
    fn named_patch_rejects_unknown_channels() {
        assert!(ParameterPatch::from_named([("hue", 1.0), ("glow", 2.0)]).is_err());
        let patch = ParameterPatch::from_named([("hue", 1.0)]).unwrap();
        assert_eq!(patch.get(Channel::Hue), Some(1.0));
    }
}
