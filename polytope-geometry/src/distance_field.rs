//! Closed-form signed distance functions over R⁴.
//!
//! Negative inside, positive outside. Polytope fields are facet-plane bounds
//! rather than exact Euclidean distances, which is all a slice renderer needs.

use crate::polytopes;
use bevy_math::Vec4;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AnalyticShape {
    Hypersphere { radius: f32 },
    Tesseract { half_extent: f32 },
    CliffordTorus { ring: f32, tube: f32 },
    /// Regular 5-cell bounded by the planes opposite each vertex.
    Simplex { normals: [Vec4; 5], inradius: f32 },
    Icositetrachoron { inradius: f32 },
}

impl AnalyticShape {
    /// 5-cell with unit circumradius.
    pub fn unit_simplex() -> Self {
        Self::simplex(1.0)
    }

    /// 5-cell scaled to `circumradius`; the inradius is a quarter of it.
    pub fn simplex(circumradius: f32) -> Self {
        let mut normals = [Vec4::ZERO; 5];
        for (slot, vertex) in normals.iter_mut().zip(polytopes::pentachoron().vertices) {
            // The facet opposite a vertex faces away from it.
            *slot = -vertex;
        }
        Self::Simplex {
            normals,
            inradius: 0.25 * circumradius,
        }
    }

    pub fn evaluate(&self, p: Vec4) -> f32 {
        match self {
            Self::Hypersphere { radius } => p.length() - radius,
            Self::Tesseract { half_extent } => {
                let q = p.abs() - Vec4::splat(*half_extent);
                q.max(Vec4::ZERO).length() + q.max_element().min(0.0)
            }
            Self::CliffordTorus { ring, tube } => {
                let a = (p.x * p.x + p.y * p.y).sqrt() - ring;
                let b = (p.z * p.z + p.w * p.w).sqrt() - ring;
                (a * a + b * b).sqrt() - tube
            }
            Self::Simplex { normals, inradius } => {
                normals
                    .iter()
                    .map(|n| n.dot(p))
                    .fold(f32::NEG_INFINITY, f32::max)
                    - inradius
            }
            Self::Icositetrachoron { inradius } => {
                let a = p.abs();
                let axis = a.max_element();
                let diagonal = (a.x + a.y + a.z + a.w) * 0.5;
                axis.max(diagonal) - inradius
            }
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
pub fn segment_distance(p: Vec4, a: Vec4, b: Vec4) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DistanceField {
    Analytic(AnalyticShape),
    /// Union of capsules around mesh edges, for families without a closed form.
    Wireframe {
        segments: Vec<(Vec4, Vec4)>,
        thickness: f32,
    },
    /// Linear blend between two fields; `amount` 0 is `base`, 1 is `target`.
    Blend {
        base: Box<DistanceField>,
        target: Box<DistanceField>,
        amount: f32,
    },
}

impl DistanceField {
    pub fn evaluate(&self, p: Vec4) -> f32 {
        match self {
            Self::Analytic(shape) => shape.evaluate(p),
            Self::Wireframe {
                segments,
                thickness,
            } => {
                segments
                    .iter()
                    .map(|(a, b)| segment_distance(p, *a, *b))
                    .fold(f32::INFINITY, f32::min)
                    - thickness
            }
            Self::Blend {
                base,
                target,
                amount,
            } => {
                let t = amount.clamp(0.0, 1.0);
                base.evaluate(p) * (1.0 - t) + target.evaluate(p) * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_and_tesseract_signs() {
        let sphere = AnalyticShape::Hypersphere { radius: 1.0 };
        assert!(sphere.evaluate(Vec4::ZERO) < 0.0);
        assert!((sphere.evaluate(Vec4::new(2.0, 0.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);

        let cube = AnalyticShape::Tesseract { half_extent: 0.5 };
        assert!((cube.evaluate(Vec4::new(0.0, 0.0, 0.0, 1.0)) - 0.5).abs() < 1e-6);
        assert!(cube.evaluate(Vec4::splat(0.1)) < 0.0);
    }

    #[test]
    fn simplex_vertices_sit_outside_their_inradius_bound() {
        let simplex = AnalyticShape::unit_simplex();
        assert!(simplex.evaluate(Vec4::ZERO) < 0.0);
        for v in polytopes::pentachoron().vertices {
            // Vertices lie on the boundary of the facet-plane intersection.
            assert!(simplex.evaluate(v).abs() < 1e-4, "{}", simplex.evaluate(v));
        }
    }

    #[test]
    fn icositetrachoron_vertices_are_on_the_surface() {
        let shape = AnalyticShape::Icositetrachoron {
            inradius: std::f32::consts::FRAC_1_SQRT_2,
        };
        for v in polytopes::icositetrachoron().vertices {
            assert!(shape.evaluate(v).abs() < 1e-5);
        }
    }

    #[test]
    fn wireframe_is_zero_level_at_thickness() {
        let field = DistanceField::Wireframe {
            segments: vec![(Vec4::ZERO, Vec4::X)],
            thickness: 0.1,
        };
        assert!((field.evaluate(Vec4::new(0.5, 0.1, 0.0, 0.0))).abs() < 1e-6);
        assert!(field.evaluate(Vec4::new(0.5, 0.0, 0.0, 0.0)) < 0.0);
    }

    #[test]
    fn blend_endpoints_match_inputs() {
        let base = DistanceField::Analytic(AnalyticShape::Tesseract { half_extent: 0.5 });
        let target = DistanceField::Analytic(AnalyticShape::Hypersphere { radius: 1.0 });
        let p = Vec4::new(0.3, -0.7, 0.2, 0.9);
        let at = |amount| DistanceField::Blend {
            base: Box::new(base.clone()),
            target: Box::new(target.clone()),
            amount,
        };
        assert_eq!(at(0.0).evaluate(p), base.evaluate(p));
        assert_eq!(at(1.0).evaluate(p), target.evaluate(p));
    }
}
