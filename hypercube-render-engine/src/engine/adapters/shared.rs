use super::frame::LayerColor;
use crate::engine::parameters::{Channel, ParameterSet};
use bevy::math::Vec3;
use constants::geometry::{MAX_FRACTAL_DEPTH, MAX_RESOLUTION, MIN_RESOLUTION};
use constants::render_settings::{AUTO_ROTATION_RATE, CHAOS_JITTER};
use polytope_geometry::{ProjectionParams, StructuralParams, WarpParams};

/// Warp strength is quantized so continuous morph changes do not thrash the primitive cache.
const WARP_STEP: f32 = 0.05;

fn unit_range(channel: Channel, value: f32) -> f32 {
    let spec = channel.spec();
    ((value - spec.min) / (spec.max - spec.min)).clamp(0.0, 1.0)
}

/// Structure derived from the visual channels: density picks resolution, morph picks warp strength.
pub fn structural_for(params: &ParameterSet) -> StructuralParams {
    let density = unit_range(Channel::GridDensity, params.get(Channel::GridDensity));
    let resolution = MIN_RESOLUTION as f32 + density * (MAX_RESOLUTION - MIN_RESOLUTION) as f32;
    let fractal_depth = if density > 0.5 { MAX_FRACTAL_DEPTH } else { 1 };
    let morph = unit_range(Channel::MorphFactor, params.get(Channel::MorphFactor));
    StructuralParams {
        resolution: resolution.round() as u16,
        fractal_depth,
        warp: WarpParams {
            strength: (morph / WARP_STEP).round() * WARP_STEP,
            ..WarpParams::default()
        },
    }
    .clamped()
}

/// Snapshot rotation plus the automatic spin in the XW and YW planes.
pub fn animated_projection(params: &ParameterSet, time: f32) -> ProjectionParams {
    let mut projection = ProjectionParams::from(params);
    let spin = time * params.get(Channel::Speed) * AUTO_ROTATION_RATE;
    projection.rotation.xw += spin;
    projection.rotation.yw += spin * 0.7;
    projection
}

/// Deterministic per-vertex wobble scaled by chaos.
pub fn chaos_jitter(index: usize, time: f32, params: &ParameterSet) -> Vec3 {
    let chaos = params.get(Channel::Chaos);
    if chaos <= 0.0 {
        return Vec3::ZERO;
    }
    let hash = (index as u32).wrapping_mul(0x9E37_79B9).rotate_left(13);
    let direction = Vec3::new(
        (hash & 0x3FF) as f32 / 511.5 - 1.0,
        ((hash >> 10) & 0x3FF) as f32 / 511.5 - 1.0,
        ((hash >> 20) & 0x3FF) as f32 / 511.5 - 1.0,
    );
    let phase = time * params.get(Channel::Speed) * 3.0 + index as f32 * 0.37;
    direction * (chaos * CHAOS_JITTER * phase.sin())
}

pub fn layer_color(params: &ParameterSet, hue_shift: f32, lightness: f32, alpha: f32) -> LayerColor {
    let intensity = params.get(Channel::Intensity);
    LayerColor {
        hue: (params.get(Channel::Hue) + hue_shift).rem_euclid(360.0),
        saturation: params.get(Channel::Saturation),
        lightness: (lightness * (0.5 + intensity)).clamp(0.0, 1.0),
        alpha: (alpha * (0.4 + 0.6 * intensity)).clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_maps_onto_the_resolution_range() {
        let mut params = ParameterSet::defaults();
        params.set_clamped(Channel::GridDensity, 5.0);
        assert_eq!(structural_for(&params).resolution, MIN_RESOLUTION);
        params.set_clamped(Channel::GridDensity, 100.0);
        let structural = structural_for(&params);
        assert_eq!(structural.resolution, MAX_RESOLUTION);
        assert_eq!(structural.fractal_depth, MAX_FRACTAL_DEPTH);
    }

    #[test]
    fn nearby_morph_values_share_a_cache_key() {
        let mut a = ParameterSet::defaults();
        let mut b = ParameterSet::defaults();
        a.set_clamped(Channel::MorphFactor, 1.001);
        b.set_clamped(Channel::MorphFactor, 1.002);
        assert_eq!(structural_for(&a), structural_for(&b));
    }

    #[test]
    fn jitter_vanishes_without_chaos() {
        let mut params = ParameterSet::defaults();
        params.set_clamped(Channel::Chaos, 0.0);
        assert_eq!(chaos_jitter(17, 3.0, &params), Vec3::ZERO);
        params.set_clamped(Channel::Chaos, 1.0);
        assert!(chaos_jitter(17, 3.0, &params).length() <= CHAOS_JITTER * 3f32.sqrt());
    }

    #[test]
    fn hue_wraps_past_360() {
        let mut params = ParameterSet::defaults();
        params.set_clamped(Channel::Hue, 350.0);
        assert_eq!(layer_color(&params, 20.0, 0.5, 1.0).hue, 10.0);
    }
}
