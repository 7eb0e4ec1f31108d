//! Rendering back-ends behind one lifecycle contract.
//!
//! An adapter never finds its own surfaces: the coordinator acquires handles
//! from the `SurfacePool` and passes them into `initialize`. Adapters turn a
//! parameter snapshot plus the shared catalog into per-surface line and point
//! layers; drawing those layers is left to the Bevy render system.

/// Holographic layered engine (C) with the audio hook.
pub mod layered;

/// Signed-distance slice engine (B).
pub mod faceted;

/// Per-surface line/point output.
pub mod frame;

/// Helpers shared by all three engines.
pub mod shared;

/// Live surface ceiling.
pub mod surface_pool;

/// Five-layer wireframe engine (A).
pub mod volumetric;

use crate::engine::coordinator::EngineIdentity;
use crate::engine::parameters::ParameterSet;
use crate::error::EngineError;
use polytope_geometry::PolytopeCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use frame::{FrameLayer, LayerColor, RenderFrame};
pub use surface_pool::{SurfaceHandle, SurfacePool};

/// Band levels in [0, 1] posted by the host page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioLevels {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
}

impl AudioLevels {
    pub fn clamped(self) -> Self {
        let band = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            bass: band(self.bass),
            mid: band(self.mid),
            high: band(self.high),
        }
    }
}

pub trait EngineAdapter: Send + Sync {
    fn identity(&self) -> EngineIdentity;

    /// Number of surfaces `initialize` expects.
    fn surface_count(&self) -> usize;

    fn initialize(&mut self, surfaces: Vec<SurfaceHandle>) -> Result<(), EngineError>;

    fn update_parameters(&mut self, params: &ParameterSet);

    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;

    /// Drop every reference to bound surfaces and cached geometry.
    fn destroy(&mut self);

    fn render(&mut self, time: f32) -> &RenderFrame;

    fn on_audio_levels(&mut self, _levels: AudioLevels) {}
}

/// Constructs adapters on demand so only one ever exists at a time.
pub trait AdapterFactory: Send + Sync {
    fn create(&self, identity: EngineIdentity) -> Result<Box<dyn EngineAdapter>, EngineError>;
}

pub struct StandardAdapterFactory {
    catalog: Arc<PolytopeCatalog>,
}

impl StandardAdapterFactory {
    pub fn new(catalog: Arc<PolytopeCatalog>) -> Self {
        Self { catalog }
    }
}

impl AdapterFactory for StandardAdapterFactory {
    fn create(&self, identity: EngineIdentity) -> Result<Box<dyn EngineAdapter>, EngineError> {
        let catalog = self.catalog.clone();
        Ok(match identity {
            EngineIdentity::Volumetric => Box::new(volumetric::VolumetricAdapter::new(catalog)),
            EngineIdentity::Faceted => Box::new(faceted::FacetedAdapter::new(catalog)),
            EngineIdentity::Layered => Box::new(layered::LayeredAdapter::new(catalog)),
        })
    }
}
