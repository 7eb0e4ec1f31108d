/// Hard ceiling on simultaneously live rendering surfaces, mirroring the
/// browser limit on live drawing contexts.
pub const MAX_LIVE_SURFACES: usize = 8;

/// Surface count each engine binds.
pub const VOLUMETRIC_LAYERS: usize = 5;
pub const FACETED_LAYERS: usize = 1;
pub const LAYERED_LAYERS: usize = 5;

/// Distance of the W "camera" used by the perspective divide.
pub const W_CAMERA_DISTANCE: f32 = 2.0;

/// World units per projected unit.
pub const RENDER_SCALE: f32 = 1.5;

/// Size of the cross markers drawn for point samples.
pub const POINT_MARKER_SIZE: f32 = 0.02;

/// Radians per second of automatic 4D spin at speed 1.
pub const AUTO_ROTATION_RATE: f32 = 0.25;

/// Amplitude of chaos-driven vertex jitter at chaos 1.
pub const CHAOS_JITTER: f32 = 0.08;

/// Sample counts per axis for the faceted slice.
pub const MIN_SLICE_SAMPLES: u32 = 16;
pub const MAX_SLICE_SAMPLES: u32 = 40;

/// Half extent of the faceted slice plane in projected units.
pub const SLICE_EXTENT: f32 = 1.4;

/// Distance band rendered by the faceted engine.
pub const SURFACE_BAND: f32 = 0.045;

pub struct LayerStyle {
    pub name: &'static str,
    pub scale: f32,
    pub alpha: f32,
    pub hue_shift: f32,
    pub lightness: f32,
    pub offset: [f32; 3],
}

/// Volumetric engine layers, back to front.
pub const VOLUMETRIC_LAYER_STYLES: [LayerStyle; VOLUMETRIC_LAYERS] = [
    LayerStyle {
        name: "background",
        scale: 1.6,
        alpha: 0.08,
        hue_shift: 0.0,
        lightness: 0.35,
        offset: [0.0, 0.0, -0.6],
    },
    LayerStyle {
        name: "shadow",
        scale: 1.02,
        alpha: 0.25,
        hue_shift: 0.0,
        lightness: 0.15,
        offset: [0.03, -0.03, -0.05],
    },
    LayerStyle {
        name: "content",
        scale: 1.0,
        alpha: 0.9,
        hue_shift: 0.0,
        lightness: 0.55,
        offset: [0.0, 0.0, 0.0],
    },
    LayerStyle {
        name: "highlight",
        scale: 1.0,
        alpha: 0.7,
        hue_shift: 20.0,
        lightness: 0.8,
        offset: [0.0, 0.0, 0.01],
    },
    LayerStyle {
        name: "accent",
        scale: 0.98,
        alpha: 0.4,
        hue_shift: 60.0,
        lightness: 0.6,
        offset: [0.0, 0.0, 0.02],
    },
];

/// Depth spacing between holographic layers.
pub const LAYER_DEPTH_SPACING: f32 = 0.12;

/// Dimension offset between consecutive holographic layers.
pub const LAYER_DIMENSION_STEP: f32 = 0.15;
