use crate::error::ParameterError;
use constants::parameters::{CHANNEL_SPECS, ChannelSpec};
use polytope_geometry::RotationPlane;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CHANNEL_COUNT: usize = 15;

/// Every tunable channel. Discriminants index `CHANNEL_SPECS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "rot4dXY")]
    Rot4dXY,
    #[serde(rename = "rot4dXZ")]
    Rot4dXZ,
    #[serde(rename = "rot4dYZ")]
    Rot4dYZ,
    #[serde(rename = "rot4dXW")]
    Rot4dXW,
    #[serde(rename = "rot4dYW")]
    Rot4dYW,
    #[serde(rename = "rot4dZW")]
    Rot4dZW,
    #[serde(rename = "geometry")]
    Geometry,
    #[serde(rename = "gridDensity")]
    GridDensity,
    #[serde(rename = "morphFactor")]
    MorphFactor,
    #[serde(rename = "chaos")]
    Chaos,
    #[serde(rename = "speed")]
    Speed,
    #[serde(rename = "hue")]
    Hue,
    #[serde(rename = "intensity")]
    Intensity,
    #[serde(rename = "saturation")]
    Saturation,
    #[serde(rename = "dimension")]
    Dimension,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Rot4dXY,
        Channel::Rot4dXZ,
        Channel::Rot4dYZ,
        Channel::Rot4dXW,
        Channel::Rot4dYW,
        Channel::Rot4dZW,
        Channel::Geometry,
        Channel::GridDensity,
        Channel::MorphFactor,
        Channel::Chaos,
        Channel::Speed,
        Channel::Hue,
        Channel::Intensity,
        Channel::Saturation,
        Channel::Dimension,
    ];

    pub const ROTATIONS: [Channel; 6] = [
        Channel::Rot4dXY,
        Channel::Rot4dXZ,
        Channel::Rot4dYZ,
        Channel::Rot4dXW,
        Channel::Rot4dYW,
        Channel::Rot4dZW,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static ChannelSpec {
        &CHANNEL_SPECS[self.index()]
    }

    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    pub fn default_value(self) -> f32 {
        self.spec().default
    }

    pub fn is_rotation(self) -> bool {
        self.rotation_plane().is_some()
    }

    pub fn rotation_plane(self) -> Option<RotationPlane> {
        match self {
            Self::Rot4dXY => Some(RotationPlane::XY),
            Self::Rot4dXZ => Some(RotationPlane::XZ),
            Self::Rot4dYZ => Some(RotationPlane::YZ),
            Self::Rot4dXW => Some(RotationPlane::XW),
            Self::Rot4dYW => Some(RotationPlane::YW),
            Self::Rot4dZW => Some(RotationPlane::ZW),
            _ => None,
        }
    }

    /// Hue is an angle on the colour wheel: `[0, 360)` with 360 folding to 0.
    pub fn wraps(self) -> bool {
        self == Self::Hue
    }

    /// Clamp into the declared range, rounding integer channels. Wrapping
    /// channels fold around instead.
    ///
    /// Callers must reject non-finite values first; `f32::clamp` passes NaN through.
    pub fn clamp(self, value: f32) -> f32 {
        let spec = self.spec();
        if self.wraps() {
            let span = spec.max - spec.min;
            let folded = (value - spec.min).rem_euclid(span);
            // rem_euclid can round up to `span` for tiny negative inputs.
            return spec.min + if folded >= span { 0.0 } else { folded };
        }
        let clamped = value.clamp(spec.min, spec.max);
        if spec.integer { clamped.round() } else { clamped }
    }

    pub fn contains(self, value: f32) -> bool {
        let spec = self.spec();
        if self.wraps() {
            return value >= spec.min && value < spec.max;
        }
        value >= spec.min && value <= spec.max
    }
}

impl FromStr for Channel {
    type Err = ParameterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| ParameterError::UnknownChannel(name.to_string()))
    }
}
