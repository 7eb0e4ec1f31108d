/// Number of base polytope families in the catalog.
pub const BASE_COUNT: u32 = 9;

/// Number of core warp variants (none, hypersphere, hypertetrahedron).
pub const CORE_COUNT: u32 = 3;

/// Total number of addressable geometry indices.
pub const GEOMETRY_COUNT: u32 = BASE_COUNT * CORE_COUNT;

/// Relative tolerance used when matching pairwise distances against a theoretical edge length.
pub const EDGE_LENGTH_TOLERANCE: f32 = 0.01;

/// Default sample count per parametric axis.
pub const DEFAULT_RESOLUTION: u16 = 12;

/// Bounds for the parametric sample count.
pub const MIN_RESOLUTION: u16 = 4;
pub const MAX_RESOLUTION: u16 = 32;

/// Default and maximum recursion depth for the fractal family.
pub const DEFAULT_FRACTAL_DEPTH: u8 = 1;
pub const MAX_FRACTAL_DEPTH: u8 = 2;

/// Default core warp strength and target radius.
pub const DEFAULT_WARP_STRENGTH: f32 = 0.75;
pub const DEFAULT_WARP_RADIUS: f32 = 1.0;

/// Capsule radius used when a mesh is converted into a wireframe distance field.
pub const WIREFRAME_THICKNESS: f32 = 0.035;

/// Maximum number of memoized primitives before the cache is flushed.
pub const PRIMITIVE_CACHE_CAPACITY: usize = 256;

pub struct BaseInfo {
    pub id: u32,
    pub name: &'static str,
}

pub const BASE_MAP: &[BaseInfo] = &[
    BaseInfo {
        id: 0,
        name: "tetrahedron",
    },
    BaseInfo {
        id: 1,
        name: "hypercube",
    },
    BaseInfo {
        id: 2,
        name: "sphere",
    },
    BaseInfo {
        id: 3,
        name: "torus",
    },
    BaseInfo {
        id: 4,
        name: "klein bottle",
    },
    BaseInfo {
        id: 5,
        name: "fractal",
    },
    BaseInfo {
        id: 6,
        name: "wave",
    },
    BaseInfo {
        id: 7,
        name: "crystal",
    },
    BaseInfo {
        id: 8,
        name: "hexacosichoron",
    },
];

pub const CORE_NAMES: &[&str] = &["base", "hypersphere", "hypertetrahedron"];
