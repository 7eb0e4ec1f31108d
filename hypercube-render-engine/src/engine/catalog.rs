use bevy::prelude::*;
use polytope_geometry::PolytopeCatalog;
use std::sync::Arc;

/// The single catalog shared by the adapter factory, RPC handlers and shortcuts.
#[derive(Resource, Clone, Deref)]
pub struct GeometryCatalog(pub Arc<PolytopeCatalog>);

impl Default for GeometryCatalog {
    fn default() -> Self {
        Self(Arc::new(PolytopeCatalog::new()))
    }
}
