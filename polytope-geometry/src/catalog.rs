use crate::codec::{GeometryIndex, GeometryIndexCodec};
use crate::core_warp::{CoreWarpKind, apply_core_warp};
use crate::distance_field::{AnalyticShape, DistanceField};
use crate::error::GeometryError;
use crate::polytopes;
use crate::primitive::{GeometryPrimitive, PolytopeMesh, Representation, StructuralParams};
use crate::surfaces;
use constants::geometry::{BASE_MAP, PRIMITIVE_CACHE_CAPACITY, WIREFRAME_THICKNESS};
use serde::Serialize;
use std::collections::HashMap;
use std::f32::consts::FRAC_1_SQRT_2;
use std::sync::{Arc, Mutex, MutexGuard};

/// Multipliers applied to visual channel defaults when a base is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualBias {
    pub density: f32,
    pub morph: f32,
    pub chaos: f32,
    pub speed: f32,
    pub hue: f32,
}

impl VisualBias {
    pub const NEUTRAL: Self = Self::new(1.0, 1.0, 1.0, 1.0, 1.0);

    const fn new(density: f32, morph: f32, chaos: f32, speed: f32, hue: f32) -> Self {
        Self {
            density,
            morph,
            chaos,
            speed,
            hue,
        }
    }
}

impl Default for VisualBias {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseGeometryDescriptor {
    pub index: u32,
    pub name: &'static str,
    /// How the mesh vertices are produced.
    pub vertex_rule: &'static str,
    /// How the distance field is produced.
    pub field_rule: &'static str,
    pub bias: VisualBias,
}

const DESCRIPTORS: [(&str, &str, VisualBias); 9] = [
    (
        "regular 5-cell, edges at √(5/2)",
        "facet planes of the 5-cell",
        VisualBias::new(1.2, 0.8, 1.0, 1.0, 1.0),
    ),
    (
        "tesseract corners (±½)⁴, edges at 1",
        "axis-aligned box",
        VisualBias::NEUTRAL,
    ),
    (
        "hyperspherical (ψ, θ, φ) grid on S³",
        "solid unit 3-sphere",
        VisualBias::new(0.8, 1.2, 0.9, 1.0, 1.1),
    ),
    (
        "Clifford torus grid wrapping in u and v",
        "tube around the Clifford torus",
        VisualBias::new(1.0, 1.1, 1.0, 1.1, 0.9),
    ),
    (
        "Klein bottle grid with the mirrored seam",
        "capsules around mesh edges",
        VisualBias::new(0.9, 1.3, 1.1, 0.9, 1.2),
    ),
    (
        "corner sub-tesseracts at one third scale",
        "capsules around mesh edges",
        VisualBias::new(1.4, 0.7, 1.3, 0.8, 0.8),
    ),
    (
        "sinusoidal sheet displaced into z and w",
        "capsules around mesh edges",
        VisualBias::new(1.0, 1.2, 0.8, 1.3, 1.05),
    ),
    (
        "24-cell permutations of (±1, ±1, 0, 0)/√2",
        "axis and diagonal facet planes",
        VisualBias::new(1.3, 0.9, 0.7, 0.9, 0.7),
    ),
    (
        "600-cell, 120 vertices, edges at 1/φ",
        "capsules around mesh edges",
        VisualBias::new(1.1, 0.9, 0.9, 0.8, 1.15),
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    base: u32,
    core: u32,
    structural: (u16, u8, u32, u32),
    representation: Representation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Default)]
struct PrimitiveCache {
    entries: HashMap<CacheKey, Arc<GeometryPrimitive>>,
    hits: u64,
    misses: u64,
}

/// Base family descriptors plus a bounded memo of generated primitives.
///
/// Shared between engines behind an `Arc`; the cache lock is only held for
/// lookups and inserts, never while generating.
pub struct PolytopeCatalog {
    codec: GeometryIndexCodec,
    descriptors: Vec<BaseGeometryDescriptor>,
    cache: Mutex<PrimitiveCache>,
}

impl Default for PolytopeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PolytopeCatalog {
    pub fn new() -> Self {
        let descriptors = BASE_MAP
            .iter()
            .zip(DESCRIPTORS)
            .map(|(info, (vertex_rule, field_rule, bias))| BaseGeometryDescriptor {
                index: info.id,
                name: info.name,
                vertex_rule,
                field_rule,
                bias,
            })
            .collect();
        Self {
            codec: GeometryIndexCodec::STANDARD,
            descriptors,
            cache: Mutex::new(PrimitiveCache::default()),
        }
    }

    pub fn codec(&self) -> &GeometryIndexCodec {
        &self.codec
    }

    pub fn descriptors(&self) -> &[BaseGeometryDescriptor] {
        &self.descriptors
    }

    pub fn describe_base(&self, base: u32) -> Result<&BaseGeometryDescriptor, GeometryError> {
        self.descriptors
            .get(base as usize)
            .ok_or(GeometryError::InvalidIndex {
                index: base,
                count: self.codec.base_count(),
            })
    }

    /// Bias of the base addressed by a flat index; neutral for anything invalid.
    pub fn bias_for_index(&self, index: GeometryIndex) -> VisualBias {
        self.codec
            .decode_index(index)
            .ok()
            .and_then(|decoded| self.describe_base(decoded.base_index).ok())
            .map_or(VisualBias::NEUTRAL, |d| d.bias)
    }

    pub fn generate_index(
        &self,
        index: GeometryIndex,
        structural: StructuralParams,
        representation: Representation,
    ) -> Result<Arc<GeometryPrimitive>, GeometryError> {
        let decoded = self.codec.decode_index(index)?;
        self.generate(decoded.base_index, decoded.core_index, structural, representation)
    }

    pub fn generate(
        &self,
        base: u32,
        core: u32,
        structural: StructuralParams,
        representation: Representation,
    ) -> Result<Arc<GeometryPrimitive>, GeometryError> {
        self.describe_base(base)?;
        let kind = CoreWarpKind::from_index(core).ok_or(GeometryError::OutOfRange {
            what: "core index",
            value: i64::from(core),
            bound: self.codec.core_count(),
        })?;
        let structural = structural.clamped();
        let key = CacheKey {
            base,
            core,
            structural: structural.cache_bits(),
            representation,
        };

        {
            let mut cache = self.lock_cache();
            if let Some(hit) = cache.entries.get(&key).cloned() {
                cache.hits += 1;
                return Ok(hit);
            }
            cache.misses += 1;
        }

        tracing::debug!(
            "Generating {} / {} ({:?}, resolution {})",
            self.descriptors[base as usize].name,
            kind.name(),
            representation,
            structural.resolution
        );
        let primitive = match representation {
            Representation::Mesh => GeometryPrimitive::Mesh(base_mesh(base, &structural)),
            Representation::Field => GeometryPrimitive::Field(base_field(base, &structural)),
        };
        let primitive = Arc::new(apply_core_warp(primitive, kind, structural.warp));

        let mut cache = self.lock_cache();
        if cache.entries.len() >= PRIMITIVE_CACHE_CAPACITY {
            tracing::debug!("Primitive cache full, flushing {} entries", cache.entries.len());
            cache.entries.clear();
        }
        cache.entries.insert(key, primitive.clone());
        Ok(primitive)
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.lock_cache();
        CacheStats {
            hits: cache.hits,
            misses: cache.misses,
            entries: cache.entries.len(),
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, PrimitiveCache> {
        // A panic mid-insert cannot leave the map half-written, so a poisoned lock is still usable.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn base_mesh(base: u32, structural: &StructuralParams) -> PolytopeMesh {
    match base {
        0 => polytopes::pentachoron(),
        1 => polytopes::tesseract(),
        2 => surfaces::hypersphere(structural.resolution),
        3 => surfaces::clifford_torus(structural.resolution),
        4 => surfaces::klein_bottle(structural.resolution),
        5 => surfaces::fractal_tesseract(structural.fractal_depth),
        6 => surfaces::wave_sheet(structural.resolution),
        7 => polytopes::icositetrachoron(),
        _ => polytopes::hexacosichoron(),
    }
}

fn base_field(base: u32, structural: &StructuralParams) -> DistanceField {
    let analytic = match base {
        0 => Some(AnalyticShape::unit_simplex()),
        1 => Some(AnalyticShape::Tesseract { half_extent: 0.5 }),
        2 => Some(AnalyticShape::Hypersphere { radius: 1.0 }),
        3 => Some(AnalyticShape::CliffordTorus {
            ring: FRAC_1_SQRT_2,
            tube: 0.12,
        }),
        7 => Some(AnalyticShape::Icositetrachoron {
            inradius: FRAC_1_SQRT_2,
        }),
        _ => None,
    };
    match analytic {
        Some(shape) => DistanceField::Analytic(shape),
        None => {
            let mesh = base_mesh(base, structural);
            DistanceField::Wireframe {
                segments: mesh.edge_segments().collect(),
                thickness: WIREFRAME_THICKNESS,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Vec4;
    use constants::geometry::{BASE_COUNT, CORE_COUNT};

    #[test]
    fn every_pair_generates_both_representations() {
        let catalog = PolytopeCatalog::new();
        let structural = StructuralParams::default().with_resolution(6);
        for base in 0..BASE_COUNT {
            for core in 0..CORE_COUNT {
                let mesh = catalog
                    .generate(base, core, structural, Representation::Mesh)
                    .unwrap();
                let mesh = mesh.as_mesh().unwrap();
                assert!(mesh.vertex_count() > 0 && mesh.edge_count() > 0);
                assert!(mesh.vertices.iter().all(|v| v.is_finite()));

                let field = catalog
                    .generate(base, core, structural, Representation::Field)
                    .unwrap();
                let value = field.as_field().unwrap().evaluate(Vec4::new(0.1, 0.2, -0.3, 0.05));
                assert!(value.is_finite(), "base {base} core {core}");
            }
        }
    }

    #[test]
    fn describe_base_rejects_out_of_range() {
        let catalog = PolytopeCatalog::new();
        assert_eq!(catalog.describe_base(8).unwrap().name, "hexacosichoron");
        assert_eq!(
            catalog.describe_base(9),
            Err(GeometryError::InvalidIndex { index: 9, count: 9 })
        );
    }

    #[test]
    fn repeated_requests_hit_the_cache() {
        let catalog = PolytopeCatalog::new();
        let structural = StructuralParams::default();
        let first = catalog.generate(8, 0, structural, Representation::Mesh).unwrap();
        let second = catalog.generate(8, 0, structural, Representation::Mesh).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        let stats = catalog.cache_stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));

        let other = catalog
            .generate(8, 0, structural.with_resolution(20), Representation::Mesh)
            .unwrap();
        // Regular polytopes ignore resolution but are still keyed separately.
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(catalog.cache_stats().entries, 2);
    }

    #[test]
    fn hexacosichoron_keeps_its_edges_through_warps() {
        let catalog = PolytopeCatalog::new();
        for core in 0..CORE_COUNT {
            let primitive = catalog
                .generate(8, core, StructuralParams::default(), Representation::Mesh)
                .unwrap();
            let mesh = primitive.as_mesh().unwrap();
            assert_eq!(mesh.vertex_count(), 120);
            assert_eq!(mesh.edge_count(), 720);
        }
    }

    #[test]
    fn generate_index_decodes_through_the_codec() {
        let catalog = PolytopeCatalog::new();
        let index = catalog.codec().encode(2, 1).unwrap();
        let primitive = catalog
            .generate_index(index, StructuralParams::default(), Representation::Mesh)
            .unwrap();
        assert!(primitive.as_mesh().unwrap().name.starts_with("tesseract"));
        assert_eq!(catalog.bias_for_index(index), VisualBias::NEUTRAL);
    }

    #[test]
    fn invalid_core_is_rejected() {
        let catalog = PolytopeCatalog::new();
        assert!(matches!(
            catalog.generate(0, 3, StructuralParams::default(), Representation::Mesh),
            Err(GeometryError::OutOfRange { .. })
        ));
    }
}
