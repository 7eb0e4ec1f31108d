//! Parametric surfaces and recursive families sampled into edge meshes.
//!
//! Every generator returns a mesh normalized to unit circumradius so the
//! core warps and the rotation pipeline see comparable scales.

use crate::primitive::PolytopeMesh;
use bevy_math::Vec4;
use std::f32::consts::{FRAC_1_SQRT_2, PI, TAU};

const KLEIN_MAJOR: f32 = 1.0;
const KLEIN_MINOR: f32 = 0.45;
const WAVE_AMPLITUDE: f32 = 0.35;
const WAVE_FREQUENCY: f32 = 1.5;

/// Row-major sample grid with optional wrapping along either axis.
struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    fn index(&self, row: usize, col: usize) -> u32 {
        (row * self.cols + col) as u32
    }

    fn edges(&self, wrap_rows: bool, wrap_cols: bool) -> Vec<[u32; 2]> {
        let mut edges = Vec::with_capacity(self.rows * self.cols * 2);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let here = self.index(row, col);
                if col + 1 < self.cols {
                    edges.push(ordered(here, self.index(row, col + 1)));
                } else if wrap_cols && self.cols > 2 {
                    edges.push(ordered(here, self.index(row, 0)));
                }
                if row + 1 < self.rows {
                    edges.push(ordered(here, self.index(row + 1, col)));
                } else if wrap_rows && self.rows > 2 {
                    edges.push(ordered(here, self.index(0, col)));
                }
            }
        }
        edges
    }
}

fn ordered(a: u32, b: u32) -> [u32; 2] {
    if a < b { [a, b] } else { [b, a] }
}

/// Hyperspherical grid on S³: ψ and θ sampled on the open interval (0, π), φ wrapping.
pub fn hypersphere(resolution: u16) -> PolytopeMesh {
    let ring = resolution.max(4) as usize;
    let band = (ring / 2).max(2);

    let mut vertices = Vec::with_capacity(band * band * ring);
    for a in 0..band {
        let psi = PI * (a as f32 + 0.5) / band as f32;
        for b in 0..band {
            let theta = PI * (b as f32 + 0.5) / band as f32;
            for c in 0..ring {
                let phi = TAU * c as f32 / ring as f32;
                vertices.push(Vec4::new(
                    psi.cos(),
                    psi.sin() * theta.cos(),
                    psi.sin() * theta.sin() * phi.cos(),
                    psi.sin() * theta.sin() * phi.sin(),
                ));
            }
        }
    }

    let index = |a: usize, b: usize, c: usize| ((a * band + b) * ring + c) as u32;
    let mut edges = Vec::with_capacity(vertices.len() * 3);
    for a in 0..band {
        for b in 0..band {
            for c in 0..ring {
                let here = index(a, b, c);
                edges.push(ordered(here, index(a, b, (c + 1) % ring)));
                if b + 1 < band {
                    edges.push(ordered(here, index(a, b + 1, c)));
                }
                if a + 1 < band {
                    edges.push(ordered(here, index(a + 1, b, c)));
                }
            }
        }
    }

    PolytopeMesh::new("hypersphere", vertices, edges)
}

/// Flat Clifford torus (cos u, sin u, cos v, sin v)/√2, wrapping in both directions.
pub fn clifford_torus(resolution: u16) -> PolytopeMesh {
    let n = resolution.max(4) as usize;
    let grid = Grid { rows: n, cols: n };
    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        let u = TAU * i as f32 / n as f32;
        for j in 0..n {
            let v = TAU * j as f32 / n as f32;
            vertices.push(Vec4::new(u.cos(), u.sin(), v.cos(), v.sin()) * FRAC_1_SQRT_2);
        }
    }
    PolytopeMesh::new("clifford torus", vertices, grid.edges(true, true))
}

fn klein_point(u: f32, v: f32) -> Vec4 {
    let tube = KLEIN_MAJOR + KLEIN_MINOR * v.cos();
    Vec4::new(
        tube * u.cos(),
        tube * u.sin(),
        KLEIN_MINOR * v.sin() * (u * 0.5).cos(),
        KLEIN_MINOR * v.sin() * (u * 0.5).sin(),
    )
}

/// Immersion-free Klein bottle in R⁴.
///
/// Going once around `u` flips the tube parameter, so the last row is glued
/// to the first with `v` mirrored instead of wrapped straight.
pub fn klein_bottle(resolution: u16) -> PolytopeMesh {
    let n = resolution.max(4) as usize;
    let grid = Grid { rows: n, cols: n };
    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        let u = TAU * i as f32 / n as f32;
        for j in 0..n {
            let v = TAU * j as f32 / n as f32;
            vertices.push(klein_point(u, v));
        }
    }

    let mut edges = grid.edges(false, true);
    for j in 0..n {
        edges.push(ordered(grid.index(n - 1, j), grid.index(0, (n - j) % n)));
    }

    PolytopeMesh::new("klein bottle", vertices, edges).scaled_to_radius(1.0)
}

/// Sinusoidal sheet over the unit square, displaced into z and w.
pub fn wave_sheet(resolution: u16) -> PolytopeMesh {
    let n = resolution.max(4) as usize;
    let grid = Grid { rows: n, cols: n };
    let mut vertices = Vec::with_capacity(n * n);
    for i in 0..n {
        let u = -1.0 + 2.0 * i as f32 / (n - 1) as f32;
        for j in 0..n {
            let v = -1.0 + 2.0 * j as f32 / (n - 1) as f32;
            let (su, cu) = (PI * WAVE_FREQUENCY * u).sin_cos();
            let (sv, cv) = (PI * WAVE_FREQUENCY * v).sin_cos();
            vertices.push(Vec4::new(u, v, WAVE_AMPLITUDE * su * cv, WAVE_AMPLITUDE * cu * sv));
        }
    }
    PolytopeMesh::new("wave", vertices, grid.edges(false, false)).scaled_to_radius(1.0)
}

/// Tesseract dust: each level keeps the 16 corner sub-tesseracts at one third scale.
pub fn fractal_tesseract(depth: u8) -> PolytopeMesh {
    let mut vertices = Vec::new();
    let mut edges = Vec::new();
    subdivide(Vec4::ZERO, 0.5, depth, &mut vertices, &mut edges);
    PolytopeMesh::new("fractal tesseract", vertices, edges).scaled_to_radius(1.0)
}

fn subdivide(center: Vec4, half: f32, depth: u8, vertices: &mut Vec<Vec4>, edges: &mut Vec<[u32; 2]>) {
    if depth == 0 {
        push_tesseract(center, half, vertices, edges);
        return;
    }
    let child_half = half / 3.0;
    for bits in 0..16u32 {
        let offset = corner(bits) * (half - child_half);
        subdivide(center + offset, child_half, depth - 1, vertices, edges);
    }
}

fn corner(bits: u32) -> Vec4 {
    let sign = |bit: u32| if bits & (1 << bit) == 0 { -1.0 } else { 1.0 };
    Vec4::new(sign(0), sign(1), sign(2), sign(3))
}

fn push_tesseract(center: Vec4, half: f32, vertices: &mut Vec<Vec4>, edges: &mut Vec<[u32; 2]>) {
    let first = vertices.len() as u32;
    for bits in 0..16u32 {
        vertices.push(center + corner(bits) * half);
    }
    // Corners are adjacent when their bit patterns differ in exactly one axis.
    for bits in 0..16u32 {
        for axis in 0..4 {
            let other = bits ^ (1 << axis);
            if bits < other {
                edges.push([first + bits, first + other]);
            }
        }
    }
}
