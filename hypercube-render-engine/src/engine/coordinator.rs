use crate::engine::adapters::{
    AdapterFactory, AudioLevels, EngineAdapter, RenderFrame, SurfaceHandle, SurfacePool,
};
use crate::engine::parameters::ParameterSet;
use crate::error::EngineError;
use bevy::prelude::*;
use constants::render_settings::{FACETED_LAYERS, LAYERED_LAYERS, VOLUMETRIC_LAYERS};
use serde::{Deserialize, Serialize};

/// The three interchangeable rendering back-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineIdentity {
    #[serde(rename = "A")]
    Volumetric,
    #[serde(rename = "B")]
    Faceted,
    #[serde(rename = "C")]
    Layered,
}

impl EngineIdentity {
    pub const ALL: [EngineIdentity; 3] = [
        EngineIdentity::Volumetric,
        EngineIdentity::Faceted,
        EngineIdentity::Layered,
    ];

    /// Accepts the single-letter ids and the descriptive names, case-insensitively.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "volumetric" => Some(Self::Volumetric),
            "b" | "faceted" | "sdf" => Some(Self::Faceted),
            "c" | "layered" | "holographic" => Some(Self::Layered),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Volumetric => "A",
            Self::Faceted => "B",
            Self::Layered => "C",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Volumetric => "volumetric",
            Self::Faceted => "faceted",
            Self::Layered => "layered",
        }
    }

    pub fn surface_count(&self) -> usize {
        match self {
            Self::Volumetric => VOLUMETRIC_LAYERS,
            Self::Faceted => FACETED_LAYERS,
            Self::Layered => LAYERED_LAYERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Active(EngineIdentity),
}

struct ActiveEngine {
    identity: EngineIdentity,
    adapter: Box<dyn EngineAdapter>,
    surfaces: Vec<SurfaceHandle>,
}

/// Owns the single live adapter and the surfaces bound to it.
///
/// The previous adapter is always torn down and its surfaces returned to the
/// pool before the next one is constructed.
#[derive(Resource)]
pub struct EngineCoordinator {
    factory: Box<dyn AdapterFactory>,
    pool: SurfacePool,
    active: Option<ActiveEngine>,
}

impl EngineCoordinator {
    pub fn new(factory: Box<dyn AdapterFactory>) -> Self {
        Self::with_pool(factory, SurfacePool::default())
    }

    pub fn with_pool(factory: Box<dyn AdapterFactory>, pool: SurfacePool) -> Self {
        Self {
            factory,
            pool,
            active: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        match &self.active {
            Some(engine) => CoordinatorState::Active(engine.identity),
            None => CoordinatorState::Idle,
        }
    }

    pub fn active_identity(&self) -> Option<EngineIdentity> {
        self.active.as_ref().map(|engine| engine.identity)
    }

    pub fn live_surfaces(&self) -> usize {
        self.pool.live_count()
    }

    /// Returns `Ok(false)` when the named engine is already active.
    pub fn switch_to(&mut self, name: &str, snapshot: &ParameterSet) -> Result<bool, EngineError> {
        let identity =
            EngineIdentity::from_string(name).ok_or_else(|| EngineError::UnknownEngine(name.to_string()))?;
        self.switch_to_identity(identity, snapshot)
    }

    pub fn switch_to_identity(
        &mut self,
        identity: EngineIdentity,
        snapshot: &ParameterSet,
    ) -> Result<bool, EngineError> {
        if self.active_identity() == Some(identity) {
            return Ok(false);
        }

        self.teardown();

        let mut adapter = self.factory.create(identity)?;
        let surfaces = match self.pool.acquire(identity.name(), adapter.surface_count()) {
            Ok(surfaces) => surfaces,
            Err(e) => {
                adapter.destroy();
                return Err(e);
            }
        };
        if let Err(e) = adapter.initialize(surfaces.clone()) {
            adapter.destroy();
            self.pool.release(&surfaces);
            return Err(e);
        }
        adapter.update_parameters(snapshot);
        adapter.set_active(true);

        info!(
            "Engine {} ({}) active on {} surfaces",
            identity.name(),
            identity.description(),
            surfaces.len()
        );
        self.active = Some(ActiveEngine {
            identity,
            adapter,
            surfaces,
        });
        Ok(true)
    }

    /// Forwarded to the active adapter only.
    pub fn on_parameter_change(&mut self, snapshot: &ParameterSet) {
        if let Some(engine) = &mut self.active {
            engine.adapter.update_parameters(snapshot);
        }
    }

    pub fn feed_audio(&mut self, levels: AudioLevels) {
        if let Some(engine) = &mut self.active {
            engine.adapter.on_audio_levels(levels);
        }
    }

    pub fn render(&mut self, time: f32) -> Option<&RenderFrame> {
        let engine = self.active.as_mut()?;
        Some(engine.adapter.render(time))
    }

    /// Tear down whatever is active. Calling it while idle does nothing.
    pub fn destroy(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut engine) = self.active.take() {
            engine.adapter.set_active(false);
            engine.adapter.destroy();
            self.pool.release(&engine.surfaces);
            info!("Engine {} released {} surfaces", engine.identity.name(), engine.surfaces.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::adapters::StandardAdapterFactory;
    use crate::engine::parameters::Channel;
    use polytope_geometry::PolytopeCatalog;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct RecordingAdapter {
        identity: EngineIdentity,
        log: Log,
        active: Arc<Mutex<Vec<(EngineIdentity, bool)>>>,
        fail_initialize: bool,
        frame: RenderFrame,
        last_hue: Option<f32>,
    }

    impl RecordingAdapter {
        fn record(&self, event: &str) {
            self.log.lock().unwrap().push(format!("{}.{}", self.identity.name(), event));
        }

        fn publish_active(&self, active: bool) {
            let mut flags = self.active.lock().unwrap();
            flags.retain(|(id, _)| *id != self.identity);
            flags.push((self.identity, active));
        }
    }

    impl EngineAdapter for RecordingAdapter {
        fn identity(&self) -> EngineIdentity {
            self.identity
        }

        fn surface_count(&self) -> usize {
            self.identity.surface_count()
        }

        fn initialize(&mut self, surfaces: Vec<SurfaceHandle>) -> Result<(), EngineError> {
            self.record("initialize");
            if self.fail_initialize {
                return Err(EngineError::ResourceUnavailable {
                    engine: self.identity.name(),
                    reason: format!("context lost for {} surfaces", surfaces.len()),
                });
            }
            Ok(())
        }

        fn update_parameters(&mut self, params: &ParameterSet) {
            self.last_hue = Some(params.get(Channel::Hue));
            self.record("update");
        }

        fn set_active(&mut self, active: bool) {
            self.publish_active(active);
            self.record(if active { "activate" } else { "deactivate" });
        }

        fn is_active(&self) -> bool {
            self.active
                .lock()
                .unwrap()
                .iter()
                .any(|(id, active)| *id == self.identity && *active)
        }

        fn destroy(&mut self) {
            self.publish_active(false);
            self.record("destroy");
        }

        fn render(&mut self, _time: f32) -> &RenderFrame {
            &self.frame
        }
    }

    #[derive(Default)]
    struct RecordingFactory {
        log: Log,
        active: Arc<Mutex<Vec<(EngineIdentity, bool)>>>,
        refuse: Option<EngineIdentity>,
        fail_initialize: Option<EngineIdentity>,
    }

    impl AdapterFactory for RecordingFactory {
        fn create(&self, identity: EngineIdentity) -> Result<Box<dyn EngineAdapter>, EngineError> {
            self.log.lock().unwrap().push(format!("{}.construct", identity.name()));
            if self.refuse == Some(identity) {
                return Err(EngineError::ResourceUnavailable {
                    engine: identity.name(),
                    reason: "no context".into(),
                });
            }
            Ok(Box::new(RecordingAdapter {
                identity,
                log: self.log.clone(),
                active: self.active.clone(),
                fail_initialize: self.fail_initialize == Some(identity),
                frame: RenderFrame::default(),
                last_hue: None,
            }))
        }
    }

    fn recording_coordinator(factory: RecordingFactory) -> (EngineCoordinator, Log, Arc<Mutex<Vec<(EngineIdentity, bool)>>>) {
        let log = factory.log.clone();
        let active = factory.active.clone();
        (EngineCoordinator::new(Box::new(factory)), log, active)
    }

    fn position(log: &[String], entry: &str) -> usize {
        log.iter()
            .position(|e| e == entry)
            .unwrap_or_else(|| panic!("{entry} missing from {log:?}"))
    }

    #[test]
    fn switching_releases_the_old_engine_before_building_the_new_one() {
        let (mut coordinator, log, active) = recording_coordinator(RecordingFactory::default());
        let snapshot = ParameterSet::defaults();

        assert_eq!(coordinator.switch_to("A", &snapshot), Ok(true));
        assert_eq!(coordinator.switch_to("B", &snapshot), Ok(true));

        let log = log.lock().unwrap().clone();
        assert!(position(&log, "A.destroy") < position(&log, "B.construct"));
        assert_eq!(log.iter().filter(|e| *e == "A.destroy").count(), 1);

        let active = active.lock().unwrap();
        let live: Vec<_> = active.iter().filter(|(_, on)| *on).collect();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].0, EngineIdentity::Faceted);
        assert_eq!(coordinator.state(), CoordinatorState::Active(EngineIdentity::Faceted));
        assert_eq!(coordinator.live_surfaces(), FACETED_LAYERS);
    }

    #[test]
    fn switching_to_the_active_engine_is_a_no_op() {
        let (mut coordinator, log, _) = recording_coordinator(RecordingFactory::default());
        let snapshot = ParameterSet::defaults();
        coordinator.switch_to("C", &snapshot).unwrap();
        let before = log.lock().unwrap().len();
        assert_eq!(coordinator.switch_to("layered", &snapshot), Ok(false));
        assert_eq!(log.lock().unwrap().len(), before);
    }

    #[test]
    fn unknown_engines_fail_without_teardown() {
        let (mut coordinator, log, _) = recording_coordinator(RecordingFactory::default());
        let snapshot = ParameterSet::defaults();
        coordinator.switch_to("A", &snapshot).unwrap();
        let before = log.lock().unwrap().clone();

        assert_eq!(
            coordinator.switch_to("Z", &snapshot),
            Err(EngineError::UnknownEngine("Z".into()))
        );
        assert_eq!(*log.lock().unwrap(), before);
        assert_eq!(coordinator.state(), CoordinatorState::Active(EngineIdentity::Volumetric));
    }

    #[test]
    fn construction_failure_leaves_the_coordinator_idle() {
        let factory = RecordingFactory {
            refuse: Some(EngineIdentity::Faceted),
            ..Default::default()
        };
        let (mut coordinator, _, _) = recording_coordinator(factory);
        let snapshot = ParameterSet::defaults();
        coordinator.switch_to("A", &snapshot).unwrap();

        assert!(matches!(
            coordinator.switch_to("B", &snapshot),
            Err(EngineError::ResourceUnavailable { .. })
        ));
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert_eq!(coordinator.live_surfaces(), 0);
    }

    #[test]
    fn initialization_failure_releases_acquired_surfaces() {
        let factory = RecordingFactory {
            fail_initialize: Some(EngineIdentity::Layered),
            ..Default::default()
        };
        let (mut coordinator, log, active) = recording_coordinator(factory);
        assert!(coordinator.switch_to("C", &ParameterSet::defaults()).is_err());
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert_eq!(coordinator.live_surfaces(), 0);
        assert!(log.lock().unwrap().contains(&"C.destroy".to_string()));
        assert!(active.lock().unwrap().iter().all(|(_, on)| !on));
    }

    #[test]
    fn surface_shortage_destroys_the_constructed_adapter() {
        let factory = RecordingFactory::default();
        let log = factory.log.clone();
        let mut coordinator = EngineCoordinator::with_pool(Box::new(factory), SurfacePool::with_capacity(2));

        assert!(matches!(
            coordinator.switch_to("A", &ParameterSet::defaults()),
            Err(EngineError::ResourceUnavailable { engine: "A", .. })
        ));
        let log = log.lock().unwrap().clone();
        assert_eq!(log, vec!["A.construct".to_string(), "A.destroy".to_string()]);
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert_eq!(coordinator.live_surfaces(), 0);
    }

    #[test]
    fn pool_ceiling_blocks_coexisting_engines() {
        // Five volumetric plus five layered surfaces would exceed the ceiling of eight.
        let (mut coordinator, _, _) = recording_coordinator(RecordingFactory::default());
        let snapshot = ParameterSet::defaults();
        coordinator.switch_to("A", &snapshot).unwrap();
        assert_eq!(coordinator.switch_to("C", &snapshot), Ok(true));
        assert_eq!(coordinator.live_surfaces(), LAYERED_LAYERS);
    }

    #[test]
    fn parameter_changes_reach_only_the_active_adapter() {
        let (mut coordinator, log, _) = recording_coordinator(RecordingFactory::default());
        let mut snapshot = ParameterSet::defaults();
        coordinator.on_parameter_change(&snapshot);
        assert!(log.lock().unwrap().is_empty());

        coordinator.switch_to("A", &snapshot).unwrap();
        snapshot.set_clamped(Channel::Hue, 42.0);
        coordinator.on_parameter_change(&snapshot);
        let updates = log.lock().unwrap().iter().filter(|e| *e == "A.update").count();
        assert_eq!(updates, 2);
    }

    #[test]
    fn destroy_is_idempotent() {
        let (mut coordinator, log, _) = recording_coordinator(RecordingFactory::default());
        coordinator.switch_to("B", &ParameterSet::defaults()).unwrap();
        coordinator.destroy();
        coordinator.destroy();
        assert_eq!(coordinator.state(), CoordinatorState::Idle);
        assert_eq!(log.lock().unwrap().iter().filter(|e| *e == "B.destroy").count(), 1);
        assert!(coordinator.render(0.0).is_none());
    }

    #[test]
    fn standard_engines_cycle_within_the_surface_ceiling() {
        let factory = StandardAdapterFactory::new(Arc::new(PolytopeCatalog::new()));
        let mut coordinator = EngineCoordinator::new(Box::new(factory));
        let snapshot = ParameterSet::defaults();
        for name in ["A", "B", "C", "A"] {
            assert_eq!(coordinator.switch_to(name, &snapshot), Ok(true));
            let frame = coordinator.render(0.1).unwrap();
            assert!(!frame.layers.is_empty());
        }
    }

    #[test]
    fn identities_parse_from_aliases() {
        assert_eq!(EngineIdentity::from_string("sdf"), Some(EngineIdentity::Faceted));
        assert_eq!(EngineIdentity::from_string(" a "), Some(EngineIdentity::Volumetric));
        assert_eq!(EngineIdentity::from_string("d"), None);
    }
}
