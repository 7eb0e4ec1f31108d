use crate::engine::adapters::frame::{LayerColor, RenderFrame};
use crate::engine::coordinator::EngineCoordinator;
use bevy::prelude::*;
use constants::render_settings::POINT_MARKER_SIZE;

pub fn layer_color(color: &LayerColor) -> Color {
    Color::hsla(
        color.hue.rem_euclid(360.0),
        color.saturation.clamp(0.0, 1.0),
        color.lightness.clamp(0.0, 1.0),
        color.alpha.clamp(0.0, 1.0),
    )
}

/// Three axis-aligned strokes centred on `p`.
pub fn point_marker(p: Vec3) -> [(Vec3, Vec3); 3] {
    let h = POINT_MARKER_SIZE * 0.5;
    [
        (p - Vec3::X * h, p + Vec3::X * h),
        (p - Vec3::Y * h, p + Vec3::Y * h),
        (p - Vec3::Z * h, p + Vec3::Z * h),
    ]
}

fn draw_frame(gizmos: &mut Gizmos, frame: &RenderFrame) {
    // Layers are emitted back to front.
    for layer in &frame.layers {
        let color = layer_color(&layer.color);
        for &(start, end) in &layer.segments {
            gizmos.line(start, end, color);
        }
        for &p in &layer.points {
            for (start, end) in point_marker(p) {
                gizmos.line(start, end, color);
            }
        }
    }
}

/// Asks the active adapter for this frame's geometry and draws it as gizmo lines.
pub fn render_active_engine(
    mut coordinator: ResMut<EngineCoordinator>,
    time: Res<Time>,
    mut gizmos: Gizmos,
) {
    if let Some(frame) = coordinator.render(time.elapsed_secs()) {
        draw_frame(&mut gizmos, frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_centred_on_the_point() {
        let p = Vec3::new(0.5, -1.0, 2.0);
        for (start, end) in point_marker(p) {
            assert!(((start + end) * 0.5 - p).length() < 1e-6);
            assert!(((end - start).length() - POINT_MARKER_SIZE).abs() < 1e-6);
        }
    }

    #[test]
    fn colors_outside_range_are_folded_back() {
        let color = layer_color(&LayerColor {
            hue: 400.0,
            saturation: 2.0,
            lightness: 0.5,
            alpha: -1.0,
        });
        let hsla: Hsla = color.into();
        assert!((hsla.hue - 40.0).abs() < 1e-4);
        assert_eq!(hsla.saturation, 1.0);
        assert_eq!(hsla.alpha, 0.0);
    }
}
