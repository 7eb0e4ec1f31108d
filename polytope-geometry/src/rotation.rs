//! Six-plane 4D rotation followed by a W perspective divide.
//!
//! Planes are always applied in `ROTATION_ORDER`: the three classical planes
//! first, then the three W-mixing planes. Each plane rotates the pair
//! `(a, b)` to `(a·cos θ − b·sin θ, a·sin θ + b·cos θ)`.

use bevy_math::{Mat4, Vec3, Vec4};
use constants::parameters::{DIMENSION_MAX, DIMENSION_MIN};
use constants::render_settings::W_CAMERA_DISTANCE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationPlane {
    XY,
    XZ,
    YZ,
    XW,
    YW,
    ZW,
}

pub const ROTATION_ORDER: [RotationPlane; 6] = [
    RotationPlane::XY,
    RotationPlane::XZ,
    RotationPlane::YZ,
    RotationPlane::XW,
    RotationPlane::YW,
    RotationPlane::ZW,
];

impl RotationPlane {
    /// Coordinate indices of the two axes spanning the plane.
    pub fn axes(self) -> (usize, usize) {
        match self {
            Self::XY => (0, 1),
            Self::XZ => (0, 2),
            Self::YZ => (1, 2),
            Self::XW => (0, 3),
            Self::YW => (1, 3),
            Self::ZW => (2, 3),
        }
    }

    pub fn matrix(self, angle: f32) -> Mat4 {
        let (a, b) = self.axes();
        let (s, c) = angle.sin_cos();
        let mut cols = Mat4::IDENTITY.to_cols_array_2d();
        cols[a][a] = c;
        cols[a][b] = s;
        cols[b][a] = -s;
        cols[b][b] = c;
        Mat4::from_cols_array_2d(&cols)
    }
}

/// Angles in radians for each rotation plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationAngles {
    pub xy: f32,
    pub xz: f32,
    pub yz: f32,
    pub xw: f32,
    pub yw: f32,
    pub zw: f32,
}

impl RotationAngles {
    pub fn angle(&self, plane: RotationPlane) -> f32 {
        match plane {
            RotationPlane::XY => self.xy,
            RotationPlane::XZ => self.xz,
            RotationPlane::YZ => self.yz,
            RotationPlane::XW => self.xw,
            RotationPlane::YW => self.yw,
            RotationPlane::ZW => self.zw,
        }
    }

    pub fn angle_mut(&mut self, plane: RotationPlane) -> &mut f32 {
        match plane {
            RotationPlane::XY => &mut self.xy,
            RotationPlane::XZ => &mut self.xz,
            RotationPlane::YZ => &mut self.yz,
            RotationPlane::XW => &mut self.xw,
            RotationPlane::YW => &mut self.yw,
            RotationPlane::ZW => &mut self.zw,
        }
    }
}

/// Everything the pipeline reads from a parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub rotation: RotationAngles,
    /// 3.0 is a plain orthographic drop of W, 4.5 is the strongest W depth.
    pub dimension: f32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            rotation: RotationAngles::default(),
            dimension: DIMENSION_MIN,
        }
    }
}

pub fn rotate_in_plane(p: Vec4, plane: RotationPlane, angle: f32) -> Vec4 {
    if angle == 0.0 {
        return p;
    }
    let (a, b) = plane.axes();
    let (s, c) = angle.sin_cos();
    let mut out = p;
    out[a] = p[a] * c - p[b] * s;
    out[b] = p[a] * s + p[b] * c;
    out
}

pub fn rotate_with_order(p: Vec4, angles: &RotationAngles, order: &[RotationPlane]) -> Vec4 {
    order
        .iter()
        .fold(p, |acc, plane| rotate_in_plane(acc, *plane, angles.angle(*plane)))
}

pub fn rotate(p: Vec4, angles: &RotationAngles) -> Vec4 {
    rotate_with_order(p, angles, &ROTATION_ORDER)
}

/// Composed matrix equal to applying `ROTATION_ORDER` one plane at a time.
pub fn rotation_matrix(angles: &RotationAngles) -> Mat4 {
    ROTATION_ORDER
        .iter()
        .fold(Mat4::IDENTITY, |acc, plane| plane.matrix(angles.angle(*plane)) * acc)
}

/// W-depth gain in [0, 1] for a dimension value.
pub fn w_depth_gain(dimension: f32) -> f32 {
    if !dimension.is_finite() {
        return 0.0;
    }
    ((dimension - DIMENSION_MIN) / (DIMENSION_MAX - DIMENSION_MIN)).clamp(0.0, 1.0)
}

/// Perspective divide of an already rotated point.
///
/// `tanh` bounds the W term so the denominator never drops below
/// `W_CAMERA_DISTANCE - 1`.
pub fn project_rotated(p: Vec4, dimension: f32) -> Vec3 {
    let gain = w_depth_gain(dimension);
    let scale = W_CAMERA_DISTANCE / (W_CAMERA_DISTANCE - gain * p.w.tanh());
    p.truncate() * scale
}

pub fn project(p: Vec4, params: &ProjectionParams) -> Vec3 {
    project_rotated(rotate(p, &params.rotation), params.dimension)
}

/// Projection with the rotation matrix composed once, for per-vertex loops.
#[derive(Debug, Clone, Copy)]
pub struct PreparedProjection {
    matrix: Mat4,
    dimension: f32,
}

impl PreparedProjection {
    pub fn new(params: &ProjectionParams) -> Self {
        Self {
            matrix: rotation_matrix(&params.rotation),
            dimension: params.dimension,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn rotate(&self, p: Vec4) -> Vec4 {
        self.matrix * p
    }

    pub fn project(&self, p: Vec4) -> Vec3 {
        project_rotated(self.rotate(p), self.dimension)
    }
}
