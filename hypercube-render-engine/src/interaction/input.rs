use super::router::InteractionRouter;
use crate::engine::parameters::ParameterStore;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::interaction::PIXELS_PER_SCROLL_LINE;

/// Raw orientation triple in degrees, from the browser sensor or the host page.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TiltReading {
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

/// Cursor position as a fraction of the surface, independent of its pixel size.
pub fn normalize_cursor(position: Vec2, size: Vec2) -> Option<Vec2> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    Some((position / size).clamp(Vec2::ZERO, Vec2::ONE))
}

/// Wheel delta in lines, positive when scrolling down.
pub fn scroll_lines(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => -y,
        MouseScrollUnit::Pixel => -y / PIXELS_PER_SCROLL_LINE,
    }
}

pub fn pointer_input_system(
    mut cursor_events: EventReader<CursorMoved>,
    windows: Query<&Window>,
    mut router: ResMut<InteractionRouter>,
    mut store: ResMut<ParameterStore>,
) {
    for event in cursor_events.read() {
        let Ok(window) = windows.get(event.window) else {
            continue;
        };
        if let Some(p) = normalize_cursor(event.position, window.size()) {
            router.route_pointer_move(p.x, p.y, &mut store);
        }
    }
}

pub fn click_input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut router: ResMut<InteractionRouter>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(position) = window.cursor_position() else {
        return;
    };
    if let Some(p) = normalize_cursor(position, window.size()) {
        router.route_click(p.x, p.y);
    }
}

pub fn scroll_input_system(
    mut wheel_events: EventReader<MouseWheel>,
    mut router: ResMut<InteractionRouter>,
    mut store: ResMut<ParameterStore>,
) {
    for event in wheel_events.read() {
        router.route_scroll(scroll_lines(event.unit, event.y), &mut store);
    }
}

pub fn tilt_input_system(
    mut readings: EventReader<TiltReading>,
    mut router: ResMut<InteractionRouter>,
    mut store: ResMut<ParameterStore>,
) {
    for reading in readings.read() {
        router.route_tilt(reading.alpha, reading.beta, reading.gamma, &mut store);
    }
}

/// The shared tick for every animated mode effect.
pub fn effect_tick_system(mut router: ResMut<InteractionRouter>, mut store: ResMut<ParameterStore>) {
    router.tick_effects(&mut store);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_normalized_by_surface_size() {
        let p = normalize_cursor(Vec2::new(400.0, 150.0), Vec2::new(800.0, 600.0)).unwrap();
        assert_eq!(p, Vec2::new(0.5, 0.25));
        let outside = normalize_cursor(Vec2::new(-5.0, 900.0), Vec2::new(800.0, 600.0)).unwrap();
        assert_eq!(outside, Vec2::new(0.0, 1.0));
        assert!(normalize_cursor(Vec2::ONE, Vec2::ZERO).is_none());
    }

    #[test]
    fn pixel_scroll_converts_to_lines() {
        assert_eq!(scroll_lines(MouseScrollUnit::Line, 1.0), -1.0);
        assert_eq!(scroll_lines(MouseScrollUnit::Pixel, -40.0), 2.0);
    }
}
