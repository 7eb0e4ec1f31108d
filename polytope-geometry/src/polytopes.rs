//! Regular convex 4-polytopes on the unit 3-sphere.
//!
//! Vertices are built by explicit sign and permutation enumeration, then
//! edges are found by comparing every pair against the theoretical edge
//! length. The pair scan is quadratic and only ever runs on a cache miss.

use crate::primitive::PolytopeMesh;
use bevy_math::Vec4;
use constants::geometry::EDGE_LENGTH_TOLERANCE;

/// Golden ratio.
pub const PHI: f32 = 1.618_034;

/// Edge length of the unit-circumradius 600-cell (2/φ at circumradius 2).
pub const HEXACOSICHORON_EDGE: f32 = 1.0 / PHI;

/// Edge length of the unit-circumradius 5-cell, √(5/2).
pub const PENTACHORON_EDGE: f32 = 1.581_138_8;

/// Tesseract and 24-cell both have edge length 1 at unit circumradius.
pub const TESSERACT_EDGE: f32 = 1.0;
pub const ICOSITETRACHORON_EDGE: f32 = 1.0;

/// Connect every pair whose distance matches `edge_length` within the relative tolerance.
pub fn connect_by_edge_length(vertices: &[Vec4], edge_length: f32, tolerance: f32) -> Vec<[u32; 2]> {
    let slack = edge_length * tolerance;
    let mut edges = Vec::new();
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if (vertices[i].distance(vertices[j]) - edge_length).abs() <= slack {
                edges.push([i as u32, j as u32]);
            }
        }
    }
    edges
}

/// The twelve even permutations of four indices.
pub fn even_permutations() -> Vec<[usize; 4]> {
    let mut result = Vec::with_capacity(12);
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                for d in 0..4 {
                    let p = [a, b, c, d];
                    let distinct = a != b && a != c && a != d && b != c && b != d && c != d;
                    if distinct && inversions(&p) % 2 == 0 {
                        result.push(p);
                    }
                }
            }
        }
    }
    result
}

fn inversions(p: &[usize; 4]) -> usize {
    let mut count = 0;
    for i in 0..4 {
        for j in (i + 1)..4 {
            if p[i] > p[j] {
                count += 1;
            }
        }
    }
    count
}

/// Regular 4-simplex with 5 vertices and 10 edges.
pub fn pentachoron() -> PolytopeMesh {
    let k = 1.0 / 5.0_f32.sqrt();
    let vertices: Vec<Vec4> = [
        Vec4::new(1.0, 1.0, 1.0, -k),
        Vec4::new(1.0, -1.0, -1.0, -k),
        Vec4::new(-1.0, 1.0, -1.0, -k),
        Vec4::new(-1.0, -1.0, 1.0, -k),
        Vec4::new(0.0, 0.0, 0.0, 4.0 * k),
    ]
    .iter()
    .map(|v| v.normalize())
    .collect();
    let edges = connect_by_edge_length(&vertices, PENTACHORON_EDGE, EDGE_LENGTH_TOLERANCE);
    PolytopeMesh::new("5-cell", vertices, edges)
}

/// Tesseract with 16 vertices and 32 edges.
pub fn tesseract() -> PolytopeMesh {
    let mut vertices = Vec::with_capacity(16);
    for bits in 0..16u32 {
        let sign = |bit: u32| if bits & (1 << bit) == 0 { -0.5 } else { 0.5 };
        vertices.push(Vec4::new(sign(0), sign(1), sign(2), sign(3)));
    }
    let edges = connect_by_edge_length(&vertices, TESSERACT_EDGE, EDGE_LENGTH_TOLERANCE);
    PolytopeMesh::new("tesseract", vertices, edges)
}

/// 24-cell with 24 vertices and 96 edges: permutations of (±1, ±1, 0, 0)/√2.
pub fn icositetrachoron() -> PolytopeMesh {
    let h = std::f32::consts::FRAC_1_SQRT_2;
    let mut vertices = Vec::with_capacity(24);
    for i in 0..4 {
        for j in (i + 1)..4 {
            for &si in &[-h, h] {
                for &sj in &[-h, h] {
                    let mut v = [0.0f32; 4];
                    v[i] = si;
                    v[j] = sj;
                    vertices.push(Vec4::from_array(v));
                }
            }
        }
    }
    let edges = connect_by_edge_length(&vertices, ICOSITETRACHORON_EDGE, EDGE_LENGTH_TOLERANCE);
    PolytopeMesh::new("24-cell", vertices, edges)
}

/// 600-cell with 120 vertices and 720 edges.
pub fn hexacosichoron() -> PolytopeMesh {
    let mut vertices = Vec::with_capacity(120);

    // Group 1: the 8 unit axis vertices.
    for axis in 0..4 {
        for &s in &[-1.0f32, 1.0] {
            let mut v = [0.0f32; 4];
            v[axis] = s;
            vertices.push(Vec4::from_array(v));
        }
    }

    // Group 2: the 16 vertices (±½, ±½, ±½, ±½).
    for bits in 0..16u32 {
        let sign = |bit: u32| if bits & (1 << bit) == 0 { -0.5 } else { 0.5 };
        vertices.push(Vec4::new(sign(0), sign(1), sign(2), sign(3)));
    }

    // Group 3: the 96 even permutations of ½(±φ, ±1, ±1/φ, 0).
    let base = [PHI * 0.5, 0.5, 0.5 / PHI, 0.0];
    for perm in even_permutations() {
        for bits in 0..8u32 {
            let mut v = [0.0f32; 4];
            for (slot, &source) in perm.iter().enumerate() {
                let magnitude = base[source];
                // Only the three non-zero coordinates carry a sign.
                let sign = if source < 3 && bits & (1 << source) != 0 {
                    -1.0
                } else {
                    1.0
                };
                v[slot] = sign * magnitude;
            }
            vertices.push(Vec4::from_array(v));
        }
    }

    for v in &mut vertices {
        *v = v.normalize();
    }

    let edges = connect_by_edge_length(&vertices, HEXACOSICHORON_EDGE, EDGE_LENGTH_TOLERANCE);
    PolytopeMesh::new("600-cell", vertices, edges)
}
