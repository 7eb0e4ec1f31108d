use super::surface_pool::SurfaceHandle;
use bevy::math::Vec3;

/// HSLA colour; hue in degrees, the rest in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerColor {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

/// Geometry drawn onto one bound surface this frame.
#[derive(Debug, Clone, Default)]
pub struct FrameLayer {
    pub surface: SurfaceHandle,
    pub name: &'static str,
    pub segments: Vec<(Vec3, Vec3)>,
    pub points: Vec<Vec3>,
    pub color: LayerColor,
}

#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub layers: Vec<FrameLayer>,
}

impl RenderFrame {
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.segments.is_empty() && l.points.is_empty())
    }

    pub fn segment_count(&self) -> usize {
        self.layers.iter().map(|l| l.segments.len()).sum()
    }
}
