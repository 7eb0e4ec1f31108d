use crate::engine::parameters::Channel;
use crate::interaction::effects::DecayEffect;
use bevy::math::Vec2;
use constants::interaction::{
    BURST_CHAOS_BOOST, BURST_DECAY, BURST_SPEED_BOOST, RIPPLE_DECAY, RIPPLE_DENSITY_BOOST,
    RIPPLE_HUE_SPREAD, RIPPLE_MORPH_AMPLITUDE, RIPPLE_PHASE_STEP,
};
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

/// Clicks add a decaying chaos/speed boost, strongest at the centre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BurstMode;

impl BurstMode {
    fn on_click(&self, p: Vec2) -> DecayEffect {
        let centrality = 1.0 - ((p - Vec2::splat(0.5)).length() / FRAC_1_SQRT_2).clamp(0.0, 1.0);
        let strength = 0.5 + 0.5 * centrality;
        DecayEffect::new("burst", BURST_DECAY)
            .with_offset(Channel::Chaos, BURST_CHAOS_BOOST * strength)
            .with_offset(Channel::Speed, BURST_SPEED_BOOST * strength)
    }
}

/// Clicks start a morph oscillation with density and hue offsets keyed to the click position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RippleMode;

impl RippleMode {
    fn on_click(&self, p: Vec2) -> DecayEffect {
        DecayEffect::new("ripple", RIPPLE_DECAY)
            .with_phase(p.x * TAU + std::f32::consts::FRAC_PI_2, RIPPLE_PHASE_STEP)
            .with_oscillation(Channel::MorphFactor, RIPPLE_MORPH_AMPLITUDE)
            .with_offset(Channel::GridDensity, RIPPLE_DENSITY_BOOST)
            .with_offset(Channel::Hue, (p.y - 0.5) * 2.0 * RIPPLE_HUE_SPREAD)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickMode {
    None,
    Burst(BurstMode),
    Ripple(RippleMode),
}

impl Default for ClickMode {
    fn default() -> Self {
        Self::Burst(BurstMode)
    }
}

impl ClickMode {
    pub const NAMES: [&'static str; 3] = ["none", "burst", "ripple"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "burst" => Some(Self::Burst(BurstMode)),
            "ripple" => Some(Self::Ripple(RippleMode)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Burst(_) => "burst",
            Self::Ripple(_) => "ripple",
        }
    }

    /// Click effects are animated only; the scheduler performs every write.
    pub fn on_click(&mut self, p: Vec2) -> Option<DecayEffect> {
        match self {
            Self::None => None,
            Self::Burst(mode) => Some(mode.on_click(p)),
            Self::Ripple(mode) => Some(mode.on_click(p)),
        }
    }
}
