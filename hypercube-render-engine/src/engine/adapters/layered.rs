use super::frame::{FrameLayer, RenderFrame};
use super::shared::{animated_projection, layer_color, structural_for};
use super::surface_pool::SurfaceHandle;
use super::{AudioLevels, EngineAdapter};
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::{Channel, ParameterSet};
use crate::error::EngineError;
use bevy::math::Vec3;
use bevy::prelude::*;
use constants::parameters::{DIMENSION_MAX, DIMENSION_MIN};
use constants::render_settings::{
    LAYER_DEPTH_SPACING, LAYER_DIMENSION_STEP, LAYERED_LAYERS, RENDER_SCALE,
};
use polytope_geometry::{
    GeometryIndex, GeometryPrimitive, PolytopeCatalog, PreparedProjection, Representation,
    StructuralParams,
};
use std::sync::Arc;

/// Frames after the last host update before the synthetic pulse takes over.
const AUDIO_STALE_FRAMES: u32 = 30;

const LAYER_NAMES: [&str; LAYERED_LAYERS] = ["deep", "back", "core", "front", "glow"];

/// Engine C: stacked projections at staggered dimensions, pulsing with audio levels.
pub struct LayeredAdapter {
    catalog: Arc<PolytopeCatalog>,
    surfaces: Vec<SurfaceHandle>,
    params: ParameterSet,
    primitive: Option<Arc<GeometryPrimitive>>,
    primitive_key: Option<(GeometryIndex, StructuralParams)>,
    audio: Option<AudioLevels>,
    frames_since_audio: u32,
    active: bool,
    frame: RenderFrame,
}

impl LayeredAdapter {
    pub fn new(catalog: Arc<PolytopeCatalog>) -> Self {
        Self {
            catalog,
            surfaces: Vec::new(),
            params: ParameterSet::defaults(),
            primitive: None,
            primitive_key: None,
            audio: None,
            frames_since_audio: 0,
            active: false,
            frame: RenderFrame::default(),
        }
    }

    fn refresh_primitive(&mut self) {
        let key = (self.params.geometry_index(), structural_for(&self.params));
        if self.primitive_key == Some(key) {
            return;
        }
        match self.catalog.generate_index(key.0, key.1, Representation::Mesh) {
            Ok(primitive) => {
                self.primitive = Some(primitive);
                self.primitive_key = Some(key);
            }
            Err(e) => warn!("Layered engine kept its previous geometry: {}", e),
        }
    }

    /// Host levels while fresh, otherwise a pulse driven by chaos and speed.
    pub fn current_levels(&self, time: f32) -> AudioLevels {
        if let Some(levels) = self.audio {
            if self.frames_since_audio <= AUDIO_STALE_FRAMES {
                return levels;
            }
        }
        let chaos = self.params.get(Channel::Chaos);
        let t = time * self.params.get(Channel::Speed);
        let wave = |rate: f32, phase: f32| chaos * (0.5 + 0.5 * (t * rate + phase).sin());
        AudioLevels {
            bass: wave(2.0, 0.0),
            mid: wave(3.0, 1.0),
            high: wave(5.0, 2.0),
        }
    }
}

impl EngineAdapter for LayeredAdapter {
    fn identity(&self) -> EngineIdentity {
        EngineIdentity::Layered
    }

    fn surface_count(&self) -> usize {
        LAYERED_LAYERS
    }

    fn initialize(&mut self, surfaces: Vec<SurfaceHandle>) -> Result<(), EngineError> {
        if surfaces.len() != LAYERED_LAYERS {
            return Err(EngineError::ResourceUnavailable {
                engine: self.identity().name(),
                reason: format!("expected {} surfaces, got {}", LAYERED_LAYERS, surfaces.len()),
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
        self.audio = None;
        self.frame.clear();
    }

    fn render(&mut self, time: f32) -> &RenderFrame {
        self.frame.clear();
        self.frames_since_audio = self.frames_since_audio.saturating_add(1);
        let Some(mesh) = self.primitive.as_deref().and_then(GeometryPrimitive::as_mesh) else {
            return &self.frame;
        };
        if !self.active {
            return &self.frame;
        }

        let levels = self.current_levels(time);
        let base = animated_projection(&self.params, time);
        let center = (LAYERED_LAYERS / 2) as f32;

        for (i, surface) in self.surfaces.iter().enumerate() {
            let offset_from_center = i as f32 - center;
            let mut projection = base;
            projection.dimension = (base.dimension + offset_from_center * LAYER_DIMENSION_STEP)
                .clamp(DIMENSION_MIN, DIMENSION_MAX);
            projection.rotation.zw += levels.mid * 0.3 * offset_from_center;
            let prepared = PreparedProjection::new(&projection);

            let falloff = 1.0 - offset_from_center.abs() / (center + 1.0);
            let scale = RENDER_SCALE * (1.0 + levels.bass * 0.25 * falloff);
            let depth = Vec3::new(0.0, 0.0, offset_from_center * LAYER_DEPTH_SPACING);
            let place = |p| prepared.project(p) * scale + depth;

            let segments = mesh
                .edge_segments()
                .map(|(a, b)| (place(a), place(b)))
                .collect();
            let hue_shift = levels.high * 40.0 + offset_from_center * 12.0;
            self.frame.layers.push(FrameLayer {
                surface: *surface,
                name: LAYER_NAMES[i % LAYER_NAMES.len()],
                segments,
                points: Vec::new(),
                color: layer_color(&self.params, hue_shift, 0.5 + 0.1 * falloff, 0.35 + 0.55 * falloff),
            });
        }
        &self.frame
    }

    fn on_audio_levels(&mut self, levels: AudioLevels) {
        self.audio = Some(levels.clamped());
        self.frames_since_audio = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::adapters::SurfacePool;

    fn ready_adapter() -> LayeredAdapter {
        let mut adapter = LayeredAdapter::new(Arc::new(PolytopeCatalog::new()));
        let surfaces = SurfacePool::default().acquire("C", LAYERED_LAYERS).unwrap();
        adapter.initialize(surfaces).unwrap();
        adapter.set_active(true);
        adapter
    }

    #[test]
    fn host_levels_override_the_synthetic_pulse_until_stale() {
        let mut adapter = ready_adapter();
        let levels = AudioLevels {
            bass: 0.9,
            mid: 0.1,
            high: 0.4,
        };
        adapter.on_audio_levels(levels);
        assert_eq!(adapter.current_levels(1.0), levels);

        for _ in 0..=AUDIO_STALE_FRAMES {
            adapter.render(1.0);
        }
        assert_ne!(adapter.current_levels(1.0), levels);
    }

    #[test]
    fn synthetic_pulse_is_silent_without_chaos() {
        let mut adapter = ready_adapter();
        let mut params = ParameterSet::defaults();
        params.set_clamped(Channel::Chaos, 0.0);
        adapter.update_parameters(&params);
        assert_eq!(adapter.current_levels(2.0), AudioLevels::default());
    }

    #[test]
    fn each_surface_gets_a_layer_and_the_core_is_brightest() {
        let mut adapter = ready_adapter();
        let bound = adapter.surfaces.clone();
        let frame = adapter.render(0.25);
        assert_eq!(frame.layers.len(), LAYERED_LAYERS);
        for (layer, surface) in frame.layers.iter().zip(&bound) {
            assert_eq!(layer.surface, *surface);
            assert_eq!(layer.segments.len(), 10);
        }
        let core = frame.layers[LAYERED_LAYERS / 2].color.alpha;
        assert!(frame.layers.iter().all(|l| l.color.alpha <= core));
    }
}
