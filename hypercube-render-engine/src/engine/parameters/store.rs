use super::channel::Channel;
use super::parameter_set::{ParameterPatch, ParameterSet};
use crate::error::ParameterError;
use bevy::prelude::*;
use polytope_geometry::VisualBias;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type ParameterListener = Box<dyn FnMut(&ParameterSet) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Single source of truth for every channel value.
///
/// All write paths clamp through the same range table. Listeners are called
/// synchronously, once per write call, with the post-write snapshot.
#[derive(Resource)]
pub struct ParameterStore {
    values: ParameterSet,
    version: u64,
    dirty: bool,
    listeners: Vec<(ListenerId, ParameterListener)>,
    next_listener: u64,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterSet::defaults())
    }
}

impl ParameterStore {
    pub fn new(initial: ParameterSet) -> Self {
        Self {
            values: initial.clamped(),
            version: 0,
            dirty: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn get(&self, name: &str) -> Result<f32, ParameterError> {
        self.values.get_named(name)
    }

    pub fn value(&self, channel: Channel) -> f32 {
        self.values.get(channel)
    }

    pub fn snapshot(&self) -> ParameterSet {
        self.values
    }

    /// Incremented on every write that changed at least one channel.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Returns whether the stored value changed. Writing the current value is a no-op.
    pub fn set(&mut self, channel: Channel, value: f32) -> bool {
        if !self.write(channel, value) {
            return false;
        }
        self.commit();
        true
    }

    pub fn set_named(&mut self, name: &str, value: f32) -> Result<bool, ParameterError> {
        Ok(self.set(name.parse()?, value))
    }

    /// Apply every entry, then notify once with the combined result.
    pub fn set_many(&mut self, patch: &ParameterPatch) -> bool {
        let mut changed = false;
        for (channel, value) in patch.iter() {
            changed |= self.write(channel, value);
        }
        if changed {
            self.commit();
        }
        changed
    }

    /// Whole-state replacement used by restore paths; clamps like any other write.
    pub fn replace(&mut self, values: &ParameterSet) -> bool {
        self.set_many(&ParameterPatch::from_set(values))
    }

    /// Draw every channel uniformly from its range.
    pub fn randomize(&mut self, rng: &mut impl Rng) -> bool {
        let mut patch = ParameterPatch::new();
        for channel in Channel::ALL {
            let spec = channel.spec();
            let value = if channel.wraps() {
                rng.gen_range(spec.min..spec.max)
            } else {
                rng.gen_range(spec.min..=spec.max)
            };
            patch.insert(channel, value);
        }
        self.set_many(&patch)
    }

    /// Defaults biased for the current geometry, which is kept.
    pub fn reset_to_defaults(&mut self, bias: VisualBias) -> bool {
        let mut defaults = ParameterSet::biased_defaults(bias);
        defaults.set_clamped(Channel::Geometry, self.value(Channel::Geometry));
        self.replace(&defaults)
    }

    pub fn subscribe(&mut self, listener: ParameterListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn write(&mut self, channel: Channel, value: f32) -> bool {
        if !value.is_finite() {
            warn!("Discarding non-finite write to {}: {}", channel.as_str(), value);
            return false;
        }
        self.values.set_clamped(channel, value)
    }

    fn commit(&mut self) {
        self.version += 1;
        self.dirty = true;
        let snapshot = self.values;
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

/// Random source for `randomize` requests, seeded from the wall clock.
#[derive(Resource)]
pub struct SessionRng(pub StdRng);

impl Default for SessionRng {
    fn default() -> Self {
        Self(StdRng::seed_from_u64(crate::persistence::state_sync::now_millis()))
    }
}
