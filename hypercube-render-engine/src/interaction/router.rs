use super::effects::{EffectOwner, EffectScheduler};
use super::modes::{ClickMode, InputCategory, PointerMode, ScrollMode};
use super::tilt::TiltFilter;
use crate::engine::parameters::ParameterStore;
use crate::error::InteractionError;
use bevy::math::Vec2;
use bevy::prelude::*;
use polytope_geometry::GeometryIndexCodec;

/// Pseudo-category accepted by `select_mode` for the orientation sensor.
pub const TILT_CATEGORY: &str = "tilt";

/// Dispatches normalized input to exactly one selected mode per category.
#[derive(Resource)]
pub struct InteractionRouter {
    pointer: PointerMode,
    click: ClickMode,
    scroll: ScrollMode,
    generations: [u64; 3],
    tilt: TiltFilter,
    tilt_enabled: bool,
    effects: EffectScheduler,
    codec: GeometryIndexCodec,
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self::new(GeometryIndexCodec::STANDARD)
    }
}

impl InteractionRouter {
    pub fn new(codec: GeometryIndexCodec) -> Self {
        Self {
            pointer: PointerMode::default(),
            click: ClickMode::default(),
            scroll: ScrollMode::default(),
            generations: [0; 3],
            tilt: TiltFilter::default(),
            tilt_enabled: true,
            effects: EffectScheduler::default(),
            codec,
        }
    }

    /// Returns `Ok(false)` when the mode is already selected; its state is kept.
    /// Effects of a replaced mode stop and hand their bases back to `store`.
    pub fn select_mode(
        &mut self,
        category: &str,
        mode: &str,
        store: &mut ParameterStore,
    ) -> Result<bool, InteractionError> {
        if category.trim().eq_ignore_ascii_case(TILT_CATEGORY) {
            return self.select_tilt(mode);
        }
        let category = InputCategory::from_string(category)
            .ok_or_else(|| InteractionError::UnknownCategory(category.to_string()))?;
        let unknown = || InteractionError::UnknownMode {
            category: category.as_str(),
            mode: mode.to_string(),
        };

        let changed = match category {
            InputCategory::PointerMove => {
                let next = PointerMode::from_name(mode).ok_or_else(unknown)?;
                replace_if_different(&mut self.pointer, next, PointerMode::name)
            }
            InputCategory::Click => {
                let next = ClickMode::from_name(mode).ok_or_else(unknown)?;
                replace_if_different(&mut self.click, next, ClickMode::name)
            }
            InputCategory::Scroll => {
                let next = ScrollMode::from_name(mode).ok_or_else(unknown)?;
                replace_if_different(&mut self.scroll, next, ScrollMode::name)
            }
        };

        if changed {
            self.generations[category.slot()] += 1;
            let cancelled = self.effects.cancel(category, store);
            info!(
                "{} mode -> {} ({} effects cancelled)",
                category.as_str(),
                self.selected_mode(category),
                cancelled
            );
        }
        Ok(changed)
    }

    fn select_tilt(&mut self, mode: &str) -> Result<bool, InteractionError> {
        let enabled = match mode.trim().to_lowercase().as_str() {
            "on" | "smoothed" | "enabled" => true,
            "none" | "off" | "disabled" => false,
            _ => {
                return Err(InteractionError::UnknownMode {
                    category: TILT_CATEGORY,
                    mode: mode.to_string(),
                });
            }
        };
        if enabled == self.tilt_enabled {
            return Ok(false);
        }
        self.tilt_enabled = enabled;
        self.tilt.clear();
        Ok(true)
    }

    pub fn selected_mode(&self, category: InputCategory) -> &'static str {
        match category {
            InputCategory::PointerMove => self.pointer.name(),
            InputCategory::Click => self.click.name(),
            InputCategory::Scroll => self.scroll.name(),
        }
    }

    pub fn tilt_enabled(&self) -> bool {
        self.tilt_enabled
    }

    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    pub fn route_pointer_move(&mut self, x: f32, y: f32, store: &mut ParameterStore) -> bool {
        let Some(p) = unit_point(x, y) else {
            return false;
        };
        let patch = self.pointer.on_pointer_move(p, &store.snapshot());
        !patch.is_empty() && store.set_many(&patch)
    }

    /// Clicks only schedule effects; the next tick writes them.
    pub fn route_click(&mut self, x: f32, y: f32) -> bool {
        let Some(p) = unit_point(x, y) else {
            return false;
        };
        let Some(effect) = self.click.on_click(p) else {
            return false;
        };
        let owner = self.owner(InputCategory::Click);
        self.effects.schedule(owner, effect);
        true
    }

    pub fn route_scroll(&mut self, lines: f32, store: &mut ParameterStore) -> bool {
        if !lines.is_finite() || lines == 0.0 {
            return false;
        }
        let response = self.scroll.on_scroll(lines, &store.snapshot(), &self.codec);
        if let Some(effect) = response.effect {
            let owner = self.owner(InputCategory::Scroll);
            self.effects.schedule(owner, effect);
        }
        !response.patch.is_empty() && store.set_many(&response.patch)
    }

    pub fn route_tilt(&mut self, alpha: f32, beta: f32, gamma: f32, store: &mut ParameterStore) -> bool {
        if !self.tilt_enabled {
            return false;
        }
        match self.tilt.push(alpha, beta, gamma) {
            Some(sample) => store.set_many(&sample.rotation_patch()),
            None => false,
        }
    }

    /// One scheduler tick. Owners are checked again in case a selection raced the schedule.
    pub fn tick_effects(&mut self, store: &mut ParameterStore) -> bool {
        let generations = self.generations;
        self.effects
            .tick(store, |owner| generations[owner.category.slot()] == owner.generation)
    }

    fn owner(&self, category: InputCategory) -> EffectOwner {
        EffectOwner {
            category,
            generation: self.generations[category.slot()],
        }
    }
}

fn replace_if_different<M>(current: &mut M, next: M, name: fn(&M) -> &'static str) -> bool {
    if name(current) == name(&next) {
        return false;
    }
    *current = next;
    true
}

fn unit_point(x: f32, y: f32) -> Option<Vec2> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)))
}
