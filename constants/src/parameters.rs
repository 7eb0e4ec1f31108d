use std::f32::consts::TAU;

/// Rotation planes accept one full turn in either direction.
pub const ROTATION_LIMIT: f32 = TAU;

pub const DIMENSION_MIN: f32 = 3.0;
pub const DIMENSION_MAX: f32 = 4.5;

pub struct ChannelSpec {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    /// Integer channels are rounded after clamping.
    pub integer: bool,
}

/// Canonical channel table. Order matches the engine's `Channel` enum.
pub const CHANNEL_SPECS: &[ChannelSpec] = &[
    ChannelSpec {
        name: "rot4dXY",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "rot4dXZ",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "rot4dYZ",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "rot4dXW",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "rot4dYW",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "rot4dZW",
        min: -ROTATION_LIMIT,
        max: ROTATION_LIMIT,
        default: 0.0,
        integer: false,
    },
    ChannelSpec {
        name: "geometry",
        min: 0.0,
        max: (crate::geometry::GEOMETRY_COUNT - 1) as f32,
        default: 0.0,
        integer: true,
    },
    ChannelSpec {
        name: "gridDensity",
        min: 5.0,
        max: 100.0,
        default: 15.0,
        integer: false,
    },
    ChannelSpec {
        name: "morphFactor",
        min: 0.0,
        max: 2.0,
        default: 1.0,
        integer: false,
    },
    ChannelSpec {
        name: "chaos",
        min: 0.0,
        max: 1.0,
        default: 0.2,
        integer: false,
    },
    ChannelSpec {
        name: "speed",
        min: 0.1,
        max: 3.0,
        default: 1.0,
        integer: false,
    },
    // 360 and 0 name the same hue.
    ChannelSpec {
        name: "hue",
        min: 0.0,
        max: 360.0,
        default: 200.0,
        integer: false,
    },
    ChannelSpec {
        name: "intensity",
        min: 0.0,
        max: 1.0,
        default: 0.5,
        integer: false,
    },
    ChannelSpec {
        name: "saturation",
        min: 0.0,
        max: 1.0,
        default: 0.8,
        integer: false,
    },
    ChannelSpec {
        name: "dimension",
        min: DIMENSION_MIN,
        max: DIMENSION_MAX,
        default: 3.5,
        integer: false,
    },
];
