use crate::engine::parameters::{Channel, ParameterPatch, ParameterSet};
use crate::interaction::effects::DecayEffect;
use constants::interaction::{
    CYCLE_STEP_THRESHOLD, SWEEP_DECAY, SWEEP_DENSITY_PER_LINE, SWEEP_HUE_PER_LINE,
};
use polytope_geometry::GeometryIndexCodec;

/// Largest scroll burst, in lines, that feeds the sweep momentum.
const SWEEP_MOMENTUM_LINES: f32 = 4.0;

#[derive(Debug, Default)]
pub struct ScrollResponse {
    pub patch: ParameterPatch,
    pub effect: Option<DecayEffect>,
}

/// Steps through geometry indices once enough scroll has accumulated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleMode {
    accumulator: f32,
}

impl CycleMode {
    fn on_scroll(&mut self, lines: f32, snapshot: &ParameterSet, codec: &GeometryIndexCodec) -> ScrollResponse {
        self.accumulator += lines;
        let steps = (self.accumulator / CYCLE_STEP_THRESHOLD).trunc();
        if steps == 0.0 {
            return ScrollResponse::default();
        }
        self.accumulator -= steps * CYCLE_STEP_THRESHOLD;

        let current = snapshot.geometry_index().value() as i64;
        let next = codec.normalize(current + steps as i64);
        ScrollResponse {
            patch: ParameterPatch::new().with(Channel::Geometry, next.value() as f32),
            effect: None,
        }
    }
}

/// Scroll turns the hue wheel and density, then coasts with decaying momentum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepMode;

impl SweepMode {
    fn on_scroll(&self, lines: f32, snapshot: &ParameterSet) -> ScrollResponse {
        let hue = (snapshot.get(Channel::Hue) + lines * SWEEP_HUE_PER_LINE).rem_euclid(360.0);
        let density = snapshot.get(Channel::GridDensity) + lines * SWEEP_DENSITY_PER_LINE;
        let momentum = lines.clamp(-SWEEP_MOMENTUM_LINES, SWEEP_MOMENTUM_LINES) * SWEEP_HUE_PER_LINE * 0.1;
        ScrollResponse {
            patch: ParameterPatch::new()
                .with(Channel::Hue, hue)
                .with(Channel::GridDensity, density),
            effect: Some(DecayEffect::new("sweep", SWEEP_DECAY).with_momentum(Channel::Hue, momentum)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollMode {
    None,
    Cycle(CycleMode),
    Sweep(SweepMode),
}

impl Default for ScrollMode {
    fn default() -> Self {
        Self::Cycle(CycleMode::default())
    }
}

impl ScrollMode {
    pub const NAMES: [&'static str; 3] = ["none", "cycle", "sweep"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "cycle" => Some(Self::Cycle(CycleMode::default())),
            "sweep" => Some(Self::Sweep(SweepMode)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cycle(_) => "cycle",
            Self::Sweep(_) => "sweep",
        }
    }

    /// `lines` is positive when scrolling down, in wheel lines.
    pub fn on_scroll(&mut self, lines: f32, snapshot: &ParameterSet, codec: &GeometryIndexCodec) -> ScrollResponse {
        match self {
            Self::None => ScrollResponse::default(),
            Self::Cycle(mode) => mode.on_scroll(lines, snapshot, codec),
            Self::Sweep(mode) => mode.on_scroll(lines, snapshot),
        }
    }
}
