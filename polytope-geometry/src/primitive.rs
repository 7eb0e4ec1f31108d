use crate::distance_field::DistanceField;
use bevy_math::Vec4;
use constants::geometry::{
    DEFAULT_FRACTAL_DEPTH, DEFAULT_RESOLUTION, DEFAULT_WARP_RADIUS, DEFAULT_WARP_STRENGTH,
    MAX_FRACTAL_DEPTH, MAX_RESOLUTION, MIN_RESOLUTION,
};
use serde::{Deserialize, Serialize};

/// Finite 4D vertex set with an undirected edge list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolytopeMesh {
    pub name: String,
    pub vertices: Vec<Vec4>,
    /// Vertex index pairs with `a < b`.
    pub edges: Vec<[u32; 2]>,
}

impl PolytopeMesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vec4>, edges: Vec<[u32; 2]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            edges,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Largest distance of any vertex from the origin.
    pub fn circumradius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }

    /// Uniformly rescale so the circumradius becomes `radius`.
    pub fn scaled_to_radius(mut self, radius: f32) -> Self {
        let current = self.circumradius();
        if current > f32::EPSILON {
            let factor = radius / current;
            for v in &mut self.vertices {
                *v *= factor;
            }
        }
        self
    }

    pub fn edge_segments(&self) -> impl Iterator<Item = (Vec4, Vec4)> + '_ {
        self.edges
            .iter()
            .map(|[a, b]| (self.vertices[*a as usize], self.vertices[*b as usize]))
    }
}

/// Which representation an engine wants for a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Mesh,
    Field,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPrimitive {
    Mesh(PolytopeMesh),
    Field(DistanceField),
}

impl GeometryPrimitive {
    pub fn as_mesh(&self) -> Option<&PolytopeMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            Self::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&DistanceField> {
        match self {
            Self::Field(field) => Some(field),
            Self::Mesh(_) => None,
        }
    }

    pub fn representation(&self) -> Representation {
        match self {
            Self::Mesh(_) => Representation::Mesh,
            Self::Field(_) => Representation::Field,
        }
    }
}

/// Continuous parameters of a core warp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarpParams {
    /// 0 leaves the geometry untouched, 1 applies the full warp.
    pub strength: f32,
    /// Radius of the target shape.
    pub radius: f32,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            strength: DEFAULT_WARP_STRENGTH,
            radius: DEFAULT_WARP_RADIUS,
        }
    }
}

impl WarpParams {
    pub fn clamped(self) -> Self {
        Self {
            strength: self.strength.clamp(0.0, 1.0),
            radius: self.radius.max(0.05),
        }
    }
}

/// Inputs that change the generated structure and therefore key the cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralParams {
    /// Samples per parametric axis.
    pub resolution: u16,
    pub fractal_depth: u8,
    pub warp: WarpParams,
}

impl Default for StructuralParams {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            fractal_depth: DEFAULT_FRACTAL_DEPTH,
            warp: WarpParams::default(),
        }
    }
}

impl StructuralParams {
    pub fn with_resolution(mut self, resolution: u16) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn clamped(self) -> Self {
        Self {
            resolution: self.resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION),
            fractal_depth: self.fractal_depth.clamp(1, MAX_FRACTAL_DEPTH),
            warp: self.warp.clamped(),
        }
    }

    /// Hashable identity; floats are compared by bit pattern.
    pub(crate) fn cache_bits(&self) -> (u16, u8, u32, u32) {
        (
            self.resolution,
            self.fractal_depth,
            self.warp.strength.to_bits(),
            self.warp.radius.to_bits(),
        )
    }
}
