use crate::engine::coordinator::EngineCoordinator;
use crate::engine::parameters::{ListenerId, ParameterSet, ParameterStore};
use bevy::prelude::*;
use std::sync::{Arc, Mutex};

/// Latest snapshot published by the store's listener, waiting for the next frame.
///
/// The listener only overwrites the slot, so several writes inside one frame
/// collapse into the newest snapshot.
#[derive(Resource, Default, Clone)]
pub struct PendingSnapshot {
    slot: Arc<Mutex<Option<ParameterSet>>>,
}

impl PendingSnapshot {
    /// Register the slot as a listener on `store`.
    pub fn attach(&self, store: &mut ParameterStore) -> ListenerId {
        let slot = self.slot.clone();
        store.subscribe(Box::new(move |snapshot| {
            if let Ok(mut pending) = slot.lock() {
                *pending = Some(*snapshot);
            }
        }))
    }

    pub fn take(&self) -> Option<ParameterSet> {
        self.slot.lock().ok().and_then(|mut pending| pending.take())
    }
}

/// Pushes the newest snapshot to the active adapter at most once per frame.
/// Intermediate versions within a frame are never replayed.
pub fn forward_parameter_changes(
    pending: Res<PendingSnapshot>,
    mut coordinator: ResMut<EngineCoordinator>,
) {
    if let Some(snapshot) = pending.take() {
        coordinator.on_parameter_change(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::adapters::StandardAdapterFactory;
    use crate::engine::parameters::{Channel, ParameterPatch};
    use bevy::ecs::system::RunSystemOnce;
    use polytope_geometry::PolytopeCatalog;

    #[test]
    fn only_the_newest_write_of_a_frame_is_pending() {
        let mut store = ParameterStore::default();
        let pending = PendingSnapshot::default();
        pending.attach(&mut store);
        assert!(pending.take().is_none());

        store.set(Channel::Hue, 10.0);
        store.set_many(&ParameterPatch::new().with(Channel::Hue, 20.0).with(Channel::Chaos, 0.7));
        let snapshot = pending.take().unwrap();
        assert_eq!(snapshot.get(Channel::Hue), 20.0);
        assert_eq!(snapshot.get(Channel::Chaos), 0.7);
        assert!(pending.take().is_none());
    }

    #[test]
    fn rejected_writes_publish_nothing() {
        let mut store = ParameterStore::default();
        let pending = PendingSnapshot::default();
        pending.attach(&mut store);
        store.set(Channel::Speed, f32::NAN);
        store.set(Channel::Speed, store.value(Channel::Speed));
        assert!(pending.take().is_none());
    }

    #[test]
    fn forwarding_drains_the_slot() {
        let mut world = World::new();
        let pending = PendingSnapshot::default();
        let mut store = ParameterStore::default();
        pending.attach(&mut store);
        let mut coordinator = EngineCoordinator::new(Box::new(StandardAdapterFactory::new(
            Arc::new(PolytopeCatalog::new()),
        )));
        coordinator.switch_to("A", &store.snapshot()).unwrap();
        store.set(Channel::Geometry, 5.0);

        world.insert_resource(store);
        world.insert_resource(pending.clone());
        world.insert_resource(coordinator);
        world.run_system_once(forward_parameter_changes).unwrap();
        assert!(pending.take().is_none());
    }
}
