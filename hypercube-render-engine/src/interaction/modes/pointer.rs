use crate::engine::parameters::{Channel, ParameterPatch, ParameterSet};
use bevy::math::Vec2;
use constants::interaction::{POINTER_ROTATION_SMOOTHING, VELOCITY_FULL_SCALE, VELOCITY_HISTORY};
use constants::parameters::{DIMENSION_MAX, DIMENSION_MIN};
use std::collections::VecDeque;
use std::f32::consts::{FRAC_1_SQRT_2, PI};

const ROTATION_CHANNELS: [Channel; 3] = [Channel::Rot4dXW, Channel::Rot4dYW, Channel::Rot4dZW];

/// Cursor position steers the three W planes, eased from the stored angles
/// toward the target so writes from other sources are picked up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationMode;

impl RotationMode {
    fn on_pointer_move(&self, p: Vec2, snapshot: &ParameterSet) -> ParameterPatch {
        let target = [(p.x - 0.5) * 2.0 * PI, (p.y - 0.5) * 2.0 * PI, (p.x - p.y) * PI];
        let mut patch = ParameterPatch::new();
        for (channel, goal) in ROTATION_CHANNELS.into_iter().zip(target) {
            let current = snapshot.get(channel);
            patch.insert(channel, current + (goal - current) * POINTER_ROTATION_SMOOTHING);
        }
        patch
    }
}

/// Pointer speed over the last few samples drives chaos and animation speed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VelocityMode {
    history: VecDeque<Vec2>,
}

impl VelocityMode {
    fn on_pointer_move(&mut self, p: Vec2) -> ParameterPatch {
        self.history.push_back(p);
        while self.history.len() > VELOCITY_HISTORY {
            self.history.pop_front();
        }
        if self.history.len() < 2 {
            return ParameterPatch::new();
        }

        let travelled: f32 = self
            .history
            .iter()
            .zip(self.history.iter().skip(1))
            .map(|(a, b)| a.distance(*b))
            .sum();
        let velocity = travelled / (self.history.len() - 1) as f32;
        let t = (velocity / VELOCITY_FULL_SCALE).clamp(0.0, 1.0);
        let speed = Channel::Speed.spec();

        ParameterPatch::new()
            .with(Channel::Chaos, t)
            .with(Channel::Speed, speed.default + t * (speed.max - speed.default))
    }
}

/// Distance from the centre pulls the projection back toward plain 3D.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DistanceMode;

impl DistanceMode {
    fn on_pointer_move(&self, p: Vec2) -> ParameterPatch {
        let d = ((p - Vec2::splat(0.5)).length() / FRAC_1_SQRT_2).clamp(0.0, 1.0);
        ParameterPatch::new()
            .with(Channel::Dimension, DIMENSION_MAX - d * (DIMENSION_MAX - DIMENSION_MIN))
            .with(Channel::Intensity, 1.0 - 0.7 * d)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerMode {
    None,
    Rotation(RotationMode),
    Velocity(VelocityMode),
    Distance(DistanceMode),
}

impl Default for PointerMode {
    fn default() -> Self {
        Self::Rotation(RotationMode)
    }
}

impl PointerMode {
    pub const NAMES: [&'static str; 4] = ["none", "rotation", "velocity", "distance"];

    /// A fresh instance of the named mode.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "rotation" | "rotate" => Some(Self::Rotation(RotationMode)),
            "velocity" => Some(Self::Velocity(VelocityMode::default())),
            "distance" => Some(Self::Distance(DistanceMode)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rotation(_) => "rotation",
            Self::Velocity(_) => "velocity",
            Self::Distance(_) => "distance",
        }
    }

    /// `p` is already normalized to the unit square.
    pub fn on_pointer_move(&mut self, p: Vec2, snapshot: &ParameterSet) -> ParameterPatch {
        match self {
            Self::None => ParameterPatch::new(),
            Self::Rotation(mode) => mode.on_pointer_move(p, snapshot),
            Self::Velocity(mode) => mode.on_pointer_move(p),
            Self::Distance(mode) => mode.on_pointer_move(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_eases_toward_the_cursor_target() {
        let mut snapshot = ParameterSet::defaults();
        let patch = RotationMode.on_pointer_move(Vec2::new(1.0, 0.5), &snapshot);
        let xw = patch.get(Channel::Rot4dXW).unwrap();
        assert!((xw - PI * POINTER_ROTATION_SMOOTHING).abs() < 1e-5);
        assert_eq!(patch.get(Channel::Rot4dYW), Some(0.0));

        for _ in 0..60 {
            let step = RotationMode.on_pointer_move(Vec2::new(1.0, 0.5), &snapshot);
            snapshot.set_clamped(Channel::Rot4dXW, step.get(Channel::Rot4dXW).unwrap());
        }
        assert!((snapshot.get(Channel::Rot4dXW) - PI).abs() < 1e-3);
    }

    #[test]
    fn rotation_eases_from_whatever_is_stored() {
        let mut snapshot = ParameterSet::defaults();
        RotationMode.on_pointer_move(Vec2::new(1.0, 0.5), &snapshot);
        snapshot.set_clamped(Channel::Rot4dXW, -1.0);
        let patch = RotationMode.on_pointer_move(Vec2::new(1.0, 0.5), &snapshot);
        let expected = -1.0 + (PI + 1.0) * POINTER_ROTATION_SMOOTHING;
        assert!((patch.get(Channel::Rot4dXW).unwrap() - expected).abs() < 1e-5);
    }

    #[test]
    fn velocity_needs_two_samples() {
        let mut mode = VelocityMode::default();
        assert!(mode.on_pointer_move(Vec2::splat(0.5)).is_empty());
        let patch = mode.on_pointer_move(Vec2::new(0.5, 0.9));
        assert_eq!(patch.get(Channel::Chaos), Some(1.0));
        assert_eq!(patch.get(Channel::Speed), Some(Channel::Speed.spec().max));
    }

    #[test]
    fn velocity_history_is_bounded() {
        let mut mode = VelocityMode::default();
        for i in 0..20 {
            mode.on_pointer_move(Vec2::new(i as f32 * 0.01, 0.0));
        }
        assert_eq!(mode.history.len(), VELOCITY_HISTORY);
    }

    #[test]
    fn distance_maps_centre_to_full_dimension() {
        let centre = DistanceMode.on_pointer_move(Vec2::splat(0.5));
        assert_eq!(centre.get(Channel::Dimension), Some(DIMENSION_MAX));
        let corner = DistanceMode.on_pointer_move(Vec2::ZERO);
        assert!((corner.get(Channel::Dimension).unwrap() - DIMENSION_MIN).abs() < 1e-5);
    }

    #[test]
    fn names_round_trip() {
        for name in PointerMode::NAMES {
            assert_eq!(PointerMode::from_name(name).unwrap().name(), name);
        }
        assert!(PointerMode::from_name("orbit").is_none());
    }
}
