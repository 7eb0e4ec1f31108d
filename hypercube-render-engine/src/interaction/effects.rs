use super::modes::InputCategory;
use crate::engine::parameters::{Channel, ParameterPatch, ParameterSet, ParameterStore};
use constants::interaction::EFFECT_EPSILON;

/// Values closer than this count as "what the effect wrote last tick".
const WRITE_TOLERANCE: f32 = 1e-4;

/// Mode selection an effect belongs to. A new selection bumps the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectOwner {
    pub category: InputCategory,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
enum EffectTrack {
    /// Offset above a base value. The base is written back on the final tick.
    Offset {
        channel: Channel,
        peak: f32,
        oscillate: bool,
        base: Option<f32>,
        last_written: Option<f32>,
    },
    /// Increment added every tick, scaled by the remaining magnitude.
    Momentum { channel: Channel, rate: f32 },
}

/// `{magnitude, decay}` state machine advanced by the scheduler tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayEffect {
    label: &'static str,
    magnitude: f32,
    decay: f32,
    phase: f32,
    phase_step: f32,
    tracks: Vec<EffectTrack>,
}

impl DecayEffect {
    pub fn new(label: &'static str, decay: f32) -> Self {
        Self {
            label,
            magnitude: 1.0,
            decay: decay.clamp(0.0, 0.99),
            phase: 0.0,
            phase_step: 0.0,
            tracks: Vec::new(),
        }
    }

    pub fn with_offset(mut self, channel: Channel, peak: f32) -> Self {
        self.tracks.push(EffectTrack::Offset {
            channel,
            peak,
            oscillate: false,
            base: None,
            last_written: None,
        });
        self
    }

    /// Offset carried on a sine wave whose phase advances each tick.
    pub fn with_oscillation(mut self, channel: Channel, peak: f32) -> Self {
        self.tracks.push(EffectTrack::Offset {
            channel,
            peak,
            oscillate: true,
            base: None,
            last_written: None,
        });
        self
    }

    pub fn with_momentum(mut self, channel: Channel, rate: f32) -> Self {
        self.tracks.push(EffectTrack::Momentum { channel, rate });
        self
    }

    pub fn with_phase(mut self, phase: f32, step: f32) -> Self {
        self.phase = phase;
        self.phase_step = step;
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// A restarted effect keeps the bases of the one it replaces.
    fn inherit_bases(&mut self, previous: &DecayEffect) {
        for track in &mut self.tracks {
            let EffectTrack::Offset { channel, base, .. } = track else {
                continue;
            };
            let inherited = previous.tracks.iter().find_map(|old| match old {
                EffectTrack::Offset {
                    channel: old_channel,
                    base: Some(old_base),
                    ..
                } if old_channel == channel => Some(*old_base),
                _ => None,
            });
            if inherited.is_some() {
                *base = inherited;
            }
        }
    }

    /// Base values of every offset that has written, adjusted for writes made
    /// by others since.
    fn restore_into(&self, snapshot: &ParameterSet, patch: &mut ParameterPatch) {
        for track in &self.tracks {
            if let EffectTrack::Offset {
                channel,
                base: Some(b),
                last_written: Some(written),
                ..
            } = track
            {
                let current = snapshot.get(*channel);
                let value = if (current - written).abs() > WRITE_TOLERANCE {
                    b + (current - written)
                } else {
                    *b
                };
                patch.insert(*channel, (*channel).clamp(value));
            }
        }
    }

    /// Write this tick's values into `patch`. Returns false once the effect has ended.
    fn step(&mut self, snapshot: &ParameterSet, patch: &mut ParameterPatch) -> bool {
        let running = self.magnitude >= EFFECT_EPSILON;
        let magnitude = if running { self.magnitude } else { 0.0 };
        let carrier = self.phase.sin();

        for track in &mut self.tracks {
            match track {
                EffectTrack::Offset {
                    channel,
                    peak,
                    oscillate,
                    base,
                    last_written,
                } => {
                    let current = snapshot.get(*channel);
                    let resolved = match (*base, *last_written) {
                        // Someone else wrote the channel; keep their change under the effect.
                        (Some(b), Some(written)) if (current - written).abs() > WRITE_TOLERANCE => {
                            b + (current - written)
                        }
                        (Some(b), _) => b,
                        (None, _) => current,
                    };
                    *base = Some(resolved);
                    let shape = if *oscillate { carrier } else { 1.0 };
                    let value = (*channel).clamp(resolved + *peak * magnitude * shape);
                    *last_written = Some(value);
                    patch.insert(*channel, value);
                }
                EffectTrack::Momentum { channel, rate } => {
                    if running {
                        let value = snapshot.get(*channel) + *rate * magnitude;
                        patch.insert(*channel, (*channel).clamp(value));
                    }
                }
            }
        }

        self.magnitude *= self.decay;
        self.phase += self.phase_step;
        running
    }
}

/// Drives every live effect from one shared tick.
#[derive(Debug, Default)]
pub struct EffectScheduler {
    effects: Vec<(EffectOwner, DecayEffect)>,
}

impl EffectScheduler {
    /// Restarting an effect with the same owner and label replaces it in place.
    pub fn schedule(&mut self, owner: EffectOwner, mut effect: DecayEffect) {
        if let Some(pos) = self
            .effects
            .iter()
            .position(|(o, e)| *o == owner && e.label == effect.label)
        {
            let (_, previous) = self.effects.remove(pos);
            effect.inherit_bases(&previous);
        }
        self.effects.push((owner, effect));
    }

    /// Drop every effect of `category`. Offsets are rolled back to their bases
    /// with one batched write; momentum keeps what it already added.
    pub fn cancel(&mut self, category: InputCategory, store: &mut ParameterStore) -> usize {
        let snapshot = store.snapshot();
        let mut restore = ParameterPatch::new();
        let before = self.effects.len();
        self.effects.retain(|(owner, effect)| {
            if owner.category != category {
                return true;
            }
            effect.restore_into(&snapshot, &mut restore);
            false
        });
        if !restore.is_empty() {
            store.set_many(&restore);
        }
        before - self.effects.len()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advance every effect whose owner is still selected and apply their
    /// combined output as a single batched write.
    pub fn tick(&mut self, store: &mut ParameterStore, is_current: impl Fn(EffectOwner) -> bool) -> bool {
        if self.effects.is_empty() {
            return false;
        }
        let snapshot = store.snapshot();
        let mut patch = ParameterPatch::new();
        self.effects
            .retain_mut(|(owner, effect)| is_current(*owner) && effect.step(&snapshot, &mut patch));
        !patch.is_empty() && store.set_many(&patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const OWNER: EffectOwner = EffectOwner {
        category: InputCategory::Click,
        generation: 1,
    };

    #[test]
    fn burst_ends_within_a_hundred_ticks_and_restores_the_base() {
        let mut store = ParameterStore::default();
        let base = store.value(Channel::Chaos);
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.90).with_offset(Channel::Chaos, 0.5));

        scheduler.tick(&mut store, |_| true);
        assert!((store.value(Channel::Chaos) - (base + 0.5)).abs() < 1e-6);

        let mut ticks = 1;
        while !scheduler.is_empty() {
            scheduler.tick(&mut store, |_| true);
            ticks += 1;
            assert!(ticks <= 100, "effect still scheduled after {ticks} ticks");
        }
        assert_eq!(store.value(Channel::Chaos), base);
    }

    #[test]
    fn effects_of_a_replaced_owner_never_write() {
        let mut store = ParameterStore::default();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        store.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.90).with_offset(Channel::Speed, 1.0));
        assert!(!scheduler.tick(&mut store, |owner| owner.generation == 2));
        assert!(scheduler.is_empty());
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn external_writes_are_kept_under_the_offset() {
        let mut store = ParameterStore::default();
        store.set(Channel::Chaos, 0.2);
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.5).with_offset(Channel::Chaos, 0.4));
        scheduler.tick(&mut store, |_| true);

        store.set(Channel::Chaos, store.value(Channel::Chaos) + 0.1);
        while !scheduler.is_empty() {
            scheduler.tick(&mut store, |_| true);
        }
        assert!((store.value(Channel::Chaos) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn one_tick_is_one_notification() {
        let mut store = ParameterStore::default();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        store.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(
            OWNER,
            DecayEffect::new("ripple", 0.88)
                .with_offset(Channel::GridDensity, 10.0)
                .with_offset(Channel::Hue, 30.0),
        );
        scheduler.schedule(
            EffectOwner {
                category: InputCategory::Scroll,
                generation: 1,
            },
            DecayEffect::new("sweep", 0.92).with_momentum(Channel::Hue, 2.0),
        );
        scheduler.tick(&mut store, |_| true);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancelling_rolls_offsets_back_in_one_write() {
        let mut store = ParameterStore::default();
        let chaos = store.value(Channel::Chaos);
        let speed = store.value(Channel::Speed);
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(
            OWNER,
            DecayEffect::new("burst", 0.9)
                .with_offset(Channel::Chaos, 0.3)
                .with_offset(Channel::Speed, 0.5),
        );
        scheduler.tick(&mut store, |_| true);
        assert!(store.value(Channel::Chaos) > chaos);

        let version = store.version();
        assert_eq!(scheduler.cancel(InputCategory::Click, &mut store), 1);
        assert_eq!(store.version(), version + 1);
        assert_eq!(store.value(Channel::Chaos), chaos);
        assert_eq!(store.value(Channel::Speed), speed);
    }

    #[test]
    fn cancelling_before_the_first_tick_writes_nothing() {
        let mut store = ParameterStore::default();
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.9).with_offset(Channel::Chaos, 0.3));
        assert_eq!(scheduler.cancel(InputCategory::Click, &mut store), 1);
        assert_eq!(scheduler.cancel(InputCategory::Click, &mut store), 0);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn momentum_wraps_hue() {
        let mut store = ParameterStore::default();
        store.set(Channel::Hue, 359.0);
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("sweep", 0.92).with_momentum(Channel::Hue, 3.0));
        scheduler.tick(&mut store, |_| true);
        assert!((store.value(Channel::Hue) - 2.0).abs() < 1e-4);
    }

    #[test]
    fn restarting_keeps_the_original_base() {
        let mut store = ParameterStore::default();
        let base = store.value(Channel::Chaos);
        let mut scheduler = EffectScheduler::default();
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.9).with_offset(Channel::Chaos, 0.3));
        scheduler.tick(&mut store, |_| true);
        scheduler.schedule(OWNER, DecayEffect::new("burst", 0.9).with_offset(Channel::Chaos, 0.3));
        assert_eq!(scheduler.len(), 1);
        while !scheduler.is_empty() {
            scheduler.tick(&mut store, |_| true);
        }
        assert_eq!(store.value(Channel::Chaos), base);
    }
}
