//! Core warps: continuous deformations of a base family toward a target shape.
//!
//! Mesh warps move vertices only, the edge list is carried over untouched.
//! Field warps blend the base field toward the target shape's field.

use crate::distance_field::{AnalyticShape, DistanceField};
use crate::polytopes;
use crate::primitive::{GeometryPrimitive, PolytopeMesh, WarpParams};
use bevy_math::Vec4;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreWarpKind {
    None,
    HypersphereWrap,
    HypertetrahedronWrap,
}

impl CoreWarpKind {
    pub const ALL: [CoreWarpKind; 3] = [
        CoreWarpKind::None,
        CoreWarpKind::HypersphereWrap,
        CoreWarpKind::HypertetrahedronWrap,
    ];

    pub fn from_index(core: u32) -> Option<Self> {
        Self::ALL.get(core as usize).copied()
    }

    pub fn index(self) -> u32 {
        match self {
            Self::None => 0,
            Self::HypersphereWrap => 1,
            Self::HypertetrahedronWrap => 2,
        }
    }

    pub fn name(self) -> &'static str {
        constants::geometry::CORE_NAMES[self.index() as usize]
    }
}

pub fn apply_core_warp(primitive: GeometryPrimitive, kind: CoreWarpKind, warp: WarpParams) -> GeometryPrimitive {
    let warp = warp.clamped();
    if kind == CoreWarpKind::None || warp.strength == 0.0 {
        return primitive;
    }
    match primitive {
        GeometryPrimitive::Mesh(mesh) => GeometryPrimitive::Mesh(warp_mesh(mesh, kind, warp)),
        GeometryPrimitive::Field(field) => GeometryPrimitive::Field(warp_field(field, kind, warp)),
    }
}

fn warp_mesh(mut mesh: PolytopeMesh, kind: CoreWarpKind, warp: WarpParams) -> PolytopeMesh {
    let directions = simplex_directions();
    for v in &mut mesh.vertices {
        let target = match kind {
            CoreWarpKind::None => *v,
            CoreWarpKind::HypersphereWrap => sphere_target(*v, warp.radius),
            CoreWarpKind::HypertetrahedronWrap => simplex_target(*v, warp.radius, &directions),
        };
        *v = v.lerp(target, warp.strength);
    }
    mesh.name = format!("{} ({})", mesh.name, kind.name());
    mesh
}

fn warp_field(field: DistanceField, kind: CoreWarpKind, warp: WarpParams) -> DistanceField {
    let target = match kind {
        CoreWarpKind::None => return field,
        CoreWarpKind::HypersphereWrap => AnalyticShape::Hypersphere {
            radius: warp.radius,
        },
        CoreWarpKind::HypertetrahedronWrap => AnalyticShape::simplex(warp.radius),
    };
    DistanceField::Blend {
        base: Box::new(field),
        target: Box::new(DistanceField::Analytic(target)),
        amount: warp.strength,
    }
}

fn simplex_directions() -> [Vec4; 5] {
    let mut directions = [Vec4::ZERO; 5];
    for (slot, v) in directions.iter_mut().zip(polytopes::pentachoron().vertices) {
        *slot = v;
    }
    directions
}

fn sphere_target(p: Vec4, radius: f32) -> Vec4 {
    // The origin has no direction and stays where it is.
    p.normalize_or_zero() * radius
}

/// Pulls a point toward the 5-cell vertices it faces, weighted by squared alignment.
fn simplex_target(p: Vec4, radius: f32, directions: &[Vec4; 5]) -> Vec4 {
    let dir = p.normalize_or_zero();
    if dir == Vec4::ZERO {
        return p;
    }
    let mut total = 0.0;
    let mut pull = Vec4::ZERO;
    for d in directions {
        let w = dir.dot(*d).max(0.0).powi(2);
        total += w;
        pull += *d * w;
    }
    if total <= f32::EPSILON {
        return p;
    }
    (pull / total) * radius * p.length().min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces;

    fn warped(kind: CoreWarpKind, strength: f32) -> PolytopeMesh {
        let primitive = GeometryPrimitive::Mesh(polytopes::tesseract());
        let warp = WarpParams {
            strength,
            radius: 1.0,
        };
        match apply_core_warp(primitive, kind, warp) {
            GeometryPrimitive::Mesh(mesh) => mesh,
            GeometryPrimitive::Field(_) => panic!("mesh warp produced a field"),
        }
    }

    #[test]
    fn none_is_identity() {
        let original = polytopes::tesseract();
        let mesh = warped(CoreWarpKind::None, 1.0);
        assert_eq!(mesh.vertices, original.vertices);
    }

    #[test]
    fn warps_preserve_connectivity() {
        let original = surfaces::klein_bottle(8);
        for kind in CoreWarpKind::ALL {
            let result = apply_core_warp(GeometryPrimitive::Mesh(original.clone()), kind, WarpParams::default());
            let mesh = result.as_mesh().cloned().unwrap_or_else(|| panic!("expected mesh"));
            assert_eq!(mesh.edges, original.edges);
            assert_eq!(mesh.vertex_count(), original.vertex_count());
        }
    }

    #[test]
    fn warp_is_continuous_in_strength() {
        for kind in [CoreWarpKind::HypersphereWrap, CoreWarpKind::HypertetrahedronWrap] {
            let a = warped(kind, 0.50);
            let b = warped(kind, 0.51);
            for (p, q) in a.vertices.iter().zip(&b.vertices) {
                assert!(p.distance(*q) < 0.05, "{kind:?} jumped from {p} to {q}");
            }
            let zero = warped(kind, 0.0);
            assert_eq!(zero.vertices, polytopes::tesseract().vertices);
        }
    }

    #[test]
    fn full_sphere_wrap_lands_on_radius() {
        let mesh = warped(CoreWarpKind::HypersphereWrap, 1.0);
        for v in &mesh.vertices {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn field_warp_blends_toward_target() {
        let field = DistanceField::Analytic(AnalyticShape::Tesseract { half_extent: 0.5 });
        let warp = WarpParams {
            strength: 1.0,
            radius: 1.0,
        };
        let result = apply_core_warp(GeometryPrimitive::Field(field), CoreWarpKind::HypersphereWrap, warp);
        let warped = result.as_field().cloned().unwrap_or_else(|| panic!("expected field"));
        let p = Vec4::new(0.0, 0.0, 2.0, 0.0);
        assert!((warped.evaluate(p) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn simplex_field_warp_scales_with_radius() {
        let field = DistanceField::Analytic(AnalyticShape::Tesseract { half_extent: 0.5 });
        let warp = WarpParams {
            strength: 1.0,
            radius: 2.0,
        };
        let result = apply_core_warp(GeometryPrimitive::Field(field), CoreWarpKind::HypertetrahedronWrap, warp);
        let warped = result.as_field().cloned().unwrap_or_else(|| panic!("expected field"));
        for v in polytopes::pentachoron().vertices {
            assert!(warped.evaluate(v * 2.0).abs() < 1e-3, "{}", warped.evaluate(v * 2.0));
        }
        assert!(warped.evaluate(Vec4::ZERO) < 0.0);
    }
}
