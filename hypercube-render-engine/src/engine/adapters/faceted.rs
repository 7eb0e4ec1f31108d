use super::frame::{FrameLayer, RenderFrame};
use super::shared::{animated_projection, layer_color, structural_for};
use super::surface_pool::SurfaceHandle;
use super::EngineAdapter;
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::{Channel, ParameterSet};
use crate::error::EngineError;
use bevy::math::{Vec3, Vec4};
use bevy::prelude::*;
use constants::render_settings::{
    FACETED_LAYERS, MAX_SLICE_SAMPLES, MIN_SLICE_SAMPLES, RENDER_SCALE, SLICE_EXTENT,
    SURFACE_BAND,
};
use polytope_geometry::rotation::project_rotated;
use polytope_geometry::{
    DistanceField, GeometryIndex, GeometryPrimitive, PolytopeCatalog, PreparedProjection,
    Representation, StructuralParams,
};
use std::sync::Arc;

/// Engine B: contours of the distance field on a 2D slice through rotated 4D space.
///
/// The slice lives in the rotated frame, so each sample is mapped back with the
/// transposed rotation before the field is evaluated.
pub struct FacetedAdapter {
    catalog: Arc<PolytopeCatalog>,
    surfaces: Vec<SurfaceHandle>,
    params: ParameterSet,
    primitive: Option<Arc<GeometryPrimitive>>,
    primitive_key: Option<(GeometryIndex, StructuralParams)>,
    samples: Vec<f32>,
    active: bool,
    frame: RenderFrame,
}

impl FacetedAdapter {
    pub fn new(catalog: Arc<PolytopeCatalog>) -> Self {
        Self {
            catalog,
            surfaces: Vec::new(),
            params: ParameterSet::defaults(),
            primitive: None,
            primitive_key: None,
            samples: Vec::new(),
            active: false,
            frame: RenderFrame::default(),
        }
    }

    fn refresh_primitive(&mut self) {
        let key = (self.params.geometry_index(), structural_for(&self.params));
        if self.primitive_key == Some(key) {
            return;
        }
        match self.catalog.generate_index(key.0, key.1, Representation::Field) {
            Ok(primitive) => {
                self.primitive = Some(primitive);
                self.primitive_key = Some(key);
            }
            Err(e) => warn!("Faceted engine kept its previous field: {}", e),
        }
    }

    fn sample_count(&self) -> usize {
        let spec = Channel::GridDensity.spec();
        let t = (self.params.get(Channel::GridDensity) - spec.min) / (spec.max - spec.min);
        let span = (MAX_SLICE_SAMPLES - MIN_SLICE_SAMPLES) as f32;
        (MIN_SLICE_SAMPLES as f32 + t.clamp(0.0, 1.0) * span).round() as usize
    }

    /// W offset of the slice plane; morph shifts it, speed sweeps it.
    fn slice_w(&self, time: f32) -> f32 {
        let morph = self.params.get(Channel::MorphFactor);
        let speed = self.params.get(Channel::Speed);
        (morph - 1.0) * 0.5 + 0.25 * (time * speed * 0.5).sin()
    }
}

/// Marching-squares contour of `values` (row-major, `n` by `n`) at level zero.
pub fn contour_segments(values: &[f32], n: usize, extent: f32) -> Vec<(Vec2, Vec2)> {
    let at = |i: usize, j: usize| values[j * n + i];
    let coord = |i: f32| -extent + 2.0 * extent * i / (n - 1) as f32;
    let crossing = |i0: usize, j0: usize, i1: usize, j1: usize| -> Option<Vec2> {
        let (a, b) = (at(i0, j0), at(i1, j1));
        if (a < 0.0) == (b < 0.0) {
            return None;
        }
        let t = a / (a - b);
        let x = i0 as f32 + (i1 as f32 - i0 as f32) * t;
        let y = j0 as f32 + (j1 as f32 - j0 as f32) * t;
        Some(Vec2::new(coord(x), coord(y)))
    };

    let mut segments = Vec::new();
    for j in 0..n.saturating_sub(1) {
        for i in 0..n.saturating_sub(1) {
            let hits: Vec<Vec2> = [
                crossing(i, j, i + 1, j),
                crossing(i + 1, j, i + 1, j + 1),
                crossing(i + 1, j + 1, i, j + 1),
                crossing(i, j + 1, i, j),
            ]
            .into_iter()
            .flatten()
            .collect();
            match hits.len() {
                2 => segments.push((hits[0], hits[1])),
                4 => {
                    segments.push((hits[0], hits[1]));
                    segments.push((hits[2], hits[3]));
                }
                _ => {}
            }
        }
    }
    segments
}

impl EngineAdapter for FacetedAdapter {
    fn identity(&self) -> EngineIdentity {
        EngineIdentity::Faceted
    }

    fn surface_count(&self) -> usize {
        FACETED_LAYERS
    }

    fn initialize(&mut self, surfaces: Vec<SurfaceHandle>) -> Result<(), EngineError> {
        if surfaces.len() != FACETED_LAYERS {
            return Err(EngineError::ResourceUnavailable {
                engine: self.identity().name(),
                reason: format!("expected {} surface, got {}", FACETED_LAYERS, surfaces.len()),
            });
        }
        self.surfaces = surfaces;
        self.refresh_primitive();
        Ok(())
    }

    fn update_parameters(&mut self, params: &ParameterSet) {
        self.params = *params;
        if !self.surfaces.is_empty() {
            self.refresh_primitive();
        }
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn destroy(&mut self) {
        self.active = false;
        self.surfaces.clear();
        self.primitive = None;
        self.primitive_key = None;
        self.samples.clear();
        self.frame.clear();
    }

    fn render(&mut self, time: f32) -> &RenderFrame {
        self.frame.clear();
        let (Some(surface), true) = (self.surfaces.first().copied(), self.active) else {
            return &self.frame;
        };
        let Some(field) = self.primitive.as_deref().and_then(GeometryPrimitive::as_field) else {
            return &self.frame;
        };

        let projection = animated_projection(&self.params, time);
        let inverse = PreparedProjection::new(&projection).matrix().transpose();
        let n = self.sample_count();
        let w = self.slice_w(time);
        let dimension = projection.dimension;

        let lift = |u: f32, v: f32| Vec4::new(u, v, 0.0, w);
        let to_world = |p: Vec2| project_rotated(lift(p.x, p.y), dimension) * (RENDER_SCALE / SLICE_EXTENT);

        self.samples.clear();
        let mut band_points = Vec::new();
        for j in 0..n {
            let v = -SLICE_EXTENT + 2.0 * SLICE_EXTENT * j as f32 / (n - 1) as f32;
            for i in 0..n {
                let u = -SLICE_EXTENT + 2.0 * SLICE_EXTENT * i as f32 / (n - 1) as f32;
                let value = evaluate(field, inverse * lift(u, v));
                if value.abs() < SURFACE_BAND {
                    band_points.push(to_world(Vec2::new(u, v)));
                }
                self.samples.push(value);
            }
        }

        let segments = contour_segments(&self.samples, n, SLICE_EXTENT)
            .into_iter()
            .map(|(a, b)| (to_world(a), to_world(b)))
            .collect();

        self.frame.layers.push(FrameLayer {
            surface,
            name: "slice",
            segments,
            points: band_points,
            color: layer_color(&self.params, 0.0, 0.6, 0.95),
        });
        &self.frame
    }
}

fn evaluate(field: &DistanceField, p: Vec4) -> f32 {
    let value = field.evaluate(p);
    if value.is_finite() { value } else { f32::MAX }
}
