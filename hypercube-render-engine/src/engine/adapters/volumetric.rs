use super::frame::{FrameLayer, RenderFrame};
use super::shared::{animated_projection, chaos_jitter, layer_color, structural_for};
use super::surface_pool::SurfaceHandle;
use super::EngineAdapter;
use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::ParameterSet;
use crate::error::EngineError;
use bevy::math::Vec3;
use bevy::prelude::*;
use constants::render_settings::{RENDER_SCALE, VOLUMETRIC_LAYER_STYLES, VOLUMETRIC_LAYERS};
use polytope_geometry::{
    GeometryIndex, GeometryPrimitive, PolytopeCatalog, PreparedProjection, Representation,
    StructuralParams,
};
use std::sync::Arc;

/// Engine A: the projected wireframe drawn five times with per-layer styling.
pub struct VolumetricAdapter {
    catalog: Arc<PolytopeCatalog>,
    surfaces: Vec<SurfaceHandle>,
    params: ParameterSet,
    primitive: Option<Arc<GeometryPrimitive>>,
    primitive_key: Option<(GeometryIndex, StructuralParams)>,
    projected: Vec<Vec3>,
    active: bool,
    frame: RenderFrame,
}

impl VolumetricAdapter {
    pub fn new(catalog: Arc<PolytopeCatalog>) -> Self {
        Self {
            catalog,
            surfaces: Vec::new(),
            params: ParameterSet::defaults(),
            primitive: None,
            primitive_key: None,
            projected: Vec::new(),
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
            Err(e) => warn!("Volumetric engine kept its previous geometry: {}", e),
        }
    }
}

impl EngineAdapter for VolumetricAdapter {
    fn identity(&self) -> EngineIdentity {
        EngineIdentity::Volumetric
    }

    fn surface_count(&self) -> usize {
        VOLUMETRIC_LAYERS
    }

    fn initialize(&mut self, surfaces: Vec<SurfaceHandle>) -> Result<(), EngineError> {
        if surfaces.len() != VOLUMETRIC_LAYERS {
            return Err(EngineError::ResourceUnavailable {
                engine: self.identity().name(),
                reason: format!("expected {} surfaces, got {}", VOLUMETRIC_LAYERS, surfaces.len()),
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
        self.projected.clear();
        self.frame.clear();
    }

    fn render(&mut self, time: f32) -> &RenderFrame {
        self.frame.clear();
        let Some(mesh) = self.primitive.as_deref().and_then(GeometryPrimitive::as_mesh) else {
            return &self.frame;
        };
        if !self.active {
            return &self.frame;
        }

        let projection = PreparedProjection::new(&animated_projection(&self.params, time));
        self.projected.clear();
        for (i, v) in mesh.vertices.iter().enumerate() {
            self.projected
                .push(projection.project(*v) + chaos_jitter(i, time, &self.params));
        }

        for (surface, style) in self.surfaces.iter().zip(VOLUMETRIC_LAYER_STYLES.iter()) {
            let scale = RENDER_SCALE * style.scale;
            let offset = Vec3::from_array(style.offset);
            let place = |p: Vec3| p * scale + offset;
            let segments = mesh
                .edges
                .iter()
                .map(|[a, b]| {
                    (
                        place(self.projected[*a as usize]),
                        place(self.projected[*b as usize]),
                    )
                })
                .collect();
            // Only the accent layer marks vertices.
            let points = if style.name == "accent" {
                self.projected.iter().map(|p| place(*p)).collect()
            } else {
                Vec::new()
            };
            self.frame.layers.push(FrameLayer {
                surface: *surface,
                name: style.name,
                segments,
                points,
                color: layer_color(&self.params, style.hue_shift, style.lightness, style.alpha),
            });
        }
        &self.frame
    }
}
