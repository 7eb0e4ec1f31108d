use crate::engine::parameters::{Channel, ParameterPatch};
use constants::interaction::{
    TILT_BETA_LIMIT, TILT_GAMMA_LIMIT, TILT_SENSITIVITY, TILT_SMOOTHING_WINDOW,
};
use std::collections::VecDeque;
use std::f32::consts::PI;

/// Device orientation in degrees: alpha in [0, 360), beta and gamma clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltSample {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl TiltSample {
    /// Beta tips XW, gamma tips YW, compass heading turns ZW.
    pub fn rotation_patch(&self) -> ParameterPatch {
        let heading = if self.alpha > 180.0 { self.alpha - 360.0 } else { self.alpha };
        ParameterPatch::new()
            .with(Channel::Rot4dXW, self.beta / TILT_BETA_LIMIT * PI * TILT_SENSITIVITY)
            .with(Channel::Rot4dYW, self.gamma / TILT_GAMMA_LIMIT * PI * TILT_SENSITIVITY)
            .with(Channel::Rot4dZW, heading / 180.0 * PI * TILT_SENSITIVITY)
    }
}

/// Clamps raw sensor angles and smooths them over a short window.
#[derive(Debug, Clone, Default)]
pub struct TiltFilter {
    samples: VecDeque<TiltSample>,
}

impl TiltFilter {
    /// Returns the smoothed reading, or `None` if the raw triple was unusable.
    pub fn push(&mut self, alpha: f32, beta: f32, gamma: f32) -> Option<TiltSample> {
        if !(alpha.is_finite() && beta.is_finite() && gamma.is_finite()) {
            return None;
        }
        self.samples.push_back(TiltSample {
            alpha: alpha.rem_euclid(360.0),
            beta: beta.clamp(-TILT_BETA_LIMIT, TILT_BETA_LIMIT),
            gamma: gamma.clamp(-TILT_GAMMA_LIMIT, TILT_GAMMA_LIMIT),
        });
        while self.samples.len() > TILT_SMOOTHING_WINDOW {
            self.samples.pop_front();
        }
        Some(self.smoothed())
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn smoothed(&self) -> TiltSample {
        let n = self.samples.len().max(1) as f32;
        let (mut sin, mut cos, mut beta, mut gamma) = (0.0, 0.0, 0.0, 0.0);
        for s in &self.samples {
            let a = s.alpha.to_radians();
            sin += a.sin();
            cos += a.cos();
            beta += s.beta;
            gamma += s.gamma;
        }
        // Heading is averaged on the circle so 359° and 1° meet at 0°.
        TiltSample {
            alpha: sin.atan2(cos).to_degrees().rem_euclid(360.0),
            beta: beta / n,
            gamma: gamma / n,
        }
    }
}
