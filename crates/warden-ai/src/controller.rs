//! # Agent controller
//!
//! Drives one agent through its patrol, chase and search behaviors. Each call to
//! [`AgentController::tick`] runs, in order:
//!
//! 1. the patrol entry action, on the very first tick only;
//! 2. perception, recording the sighting when the target is visible;
//! 3. the state clock, which doubles as the search timer while searching;
//! 4. the transition rules, where visibility always wins over the search timeout;
//! 5. on a transition, the entry action of the new state;
//! 6. the per-tick action of the current state, unless step 5 already issued a destination.

use crate::config::{AgentConfig, LostTargetPolicy};
use crate::debug::DebugOverlay;
use crate::errors::{AgentError, AgentResult};
use crate::events::{AgentEvent, AgentId, EventSender};
use crate::fsm::{AgentState, StateMachine, Transition};
use crate::patrol::next_patrol_destination;
use crate::perception::{Confirmation, Visibility, is_target_visible};
use crate::search::{SearchSample, sample_search_point};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use warden_core::Dt;
use warden_core::collaborators::{Navigator, Occluder, TargetSource};
use warden_core::transforms::Pose;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// State after the tick.
    pub state: AgentState,
    pub transition: Option<Transition<AgentState>>,
    pub visibility: Visibility,
    /// Destination handed to the navigator during the tick, if any.
    pub destination_issued: Option<cgmath::Vector3<f32>>,
}

/// Decides which state follows `state`.
///
/// # Arguments
///
/// * `state` - The current state.
/// * `target_visible` - Result of this tick's perception query.
/// * `time_in_state` - Time spent in `state`; the search timer while searching.
/// * `config` - Supplies the search timeout and the lost-target policy.
///
/// # Returns
///
/// The state to switch to, or `None` to stay.
pub fn next_state(
    state: AgentState,
    target_visible: bool,
    time_in_state: Dt,
    config: &AgentConfig,
) -> Option<AgentState> {
    match (state, target_visible) {
        (AgentState::Patrolling, true) => Some(AgentState::Chasing),
        (AgentState::Patrolling, false) => None,
        (AgentState::Chasing, true) => None,
        (AgentState::Chasing, false) => Some(match config.lost_target {
            LostTargetPolicy::Search => AgentState::Searching,
            LostTargetPolicy::Patrol => AgentState::Patrolling,
        }),
        (AgentState::Searching, true) => Some(AgentState::Chasing),
        (AgentState::Searching, false) if time_in_state >= config.search.timeout => {
            Some(AgentState::Patrolling)
        }
        (AgentState::Searching, false) => None,
    }
}

/// Builder for [`AgentController`].
pub struct AgentControllerBuilder {
    config: AgentConfig,
    id: AgentId,
    target: Option<Arc<dyn TargetSource>>,
    seed: Option<u64>,
    events: Option<EventSender>,
}

impl AgentControllerBuilder {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            id: AgentId::default(),
            target: None,
            seed: None,
            events: None,
        }
    }

    pub fn id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }

    /// Sets the source of the tracked target's pose. Required.
    pub fn target(mut self, target: Arc<dyn TargetSource>) -> Self {
        self.target = Some(target);
        self
    }

    /// Seeds the controller's random source; without a seed it is seeded from the OS.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Publishes agent events on the given channel.
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Validates the configuration and builds the controller.
    ///
    /// # Returns
    ///
    /// [`AgentError::MissingTarget`] without a target source, [`AgentError::Config`] when the
    /// configuration is degenerate.
    pub fn build(self) -> AgentResult<AgentController> {
        self.config.validate()?;

        let target = self
            .target
            .ok_or_else(|| AgentError::MissingTarget(self.id.to_string()))?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(AgentController {
            id: self.id,
            config: self.config,
            fsm: StateMachine::new(AgentState::Patrolling),
            target,
            last_known: None,
            destination: None,
            started: false,
            target_in_sight: false,
            rejected_samples: 0,
            rng,
            events: self.events,
        })
    }
}

/// Patrol, chase and search state machine of a single agent.
///
/// The controller owns its state, the search timer and the last known target position. The
/// navigation and ray query collaborators are borrowed for the duration of a tick.
pub struct AgentController {
    id: AgentId,
    config: AgentConfig,
    fsm: StateMachine<AgentState>,
    target: Arc<dyn TargetSource>,
    last_known: Option<cgmath::Vector3<f32>>,
    destination: Option<cgmath::Vector3<f32>>,
    started: bool,
    target_in_sight: bool,
    rejected_samples: u32,
    rng: StdRng,
    events: Option<EventSender>,
}

impl AgentController {
    pub fn builder(config: AgentConfig) -> AgentControllerBuilder {
        AgentControllerBuilder::new(config)
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> AgentState {
        self.fsm.current()
    }

    /// Time spent searching, `None` unless the agent is searching.
    pub fn search_timer(&self) -> Option<Dt> {
        match self.fsm.current() {
            AgentState::Searching => Some(self.fsm.time_in_state()),
            AgentState::Patrolling | AgentState::Chasing => None,
        }
    }

    /// Position of the most recent confirmed sighting.
    pub fn last_known_position(&self) -> Option<cgmath::Vector3<f32>> {
        self.last_known
    }

    /// Last destination handed to the navigator.
    pub fn destination(&self) -> Option<cgmath::Vector3<f32>> {
        self.destination
    }

    /// Search candidates rejected in a row since the last successful snap.
    pub fn consecutive_rejections(&self) -> u32 {
        self.rejected_samples
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn debug_overlay(&self) -> DebugOverlay {
        DebugOverlay::new(
            &self.config,
            self.fsm.current(),
            self.destination,
            self.last_known,
        )
    }

    /// Runs the entry action of the initial state. Later calls do nothing.
    ///
    /// [`AgentController::tick`] starts the controller on its own; calling this is only needed
    /// to issue the first destination before the first tick.
    ///
    /// # Returns
    ///
    /// The destination issued by the entry action, if any.
    pub fn start<N>(&mut self, nav: &mut N) -> Option<cgmath::Vector3<f32>>
    where
        N: Navigator + ?Sized,
    {
        if self.started {
            return None;
        }
        self.started = true;
        info!("{} starts {}", self.id, self.fsm.current());
        self.enter(self.fsm.current(), nav)
    }

    /// Advances the agent by one simulation step.
    ///
    /// # Arguments
    ///
    /// * `dt` - Simulation time elapsed since the previous tick.
    /// * `agent` - Current pose of the agent.
    /// * `nav` - Navigation engine bound to this agent.
    /// * `occluder` - Ray query engine for line of sight.
    pub fn tick<N, O>(&mut self, dt: Dt, agent: &Pose, nav: &mut N, occluder: &O) -> TickOutcome
    where
        N: Navigator + ?Sized,
        O: Occluder + ?Sized,
    {
        let mut issued = self.start(nav);
        let mut entered_with_destination = issued.is_some();

        let target = self.target.pose();
        let visibility = is_target_visible(
            agent,
            &target,
            &self.config.perception,
            occluder,
            self.last_known,
        );
        self.observe(&visibility);

        self.fsm.update(dt);

        let transition = next_state(
            self.fsm.current(),
            visibility.is_visible(),
            self.fsm.time_in_state(),
            &self.config,
        )
        .and_then(|next| self.fsm.transition_to(next));

        if let Some(transition) = transition {
            info!("{} {} -> {}", self.id, transition.from, transition.to);
            self.emit(AgentEvent::StateChanged {
                agent: self.id,
                from: transition.from,
                to: transition.to,
            });

            let entry = self.enter(transition.to, nav);
            entered_with_destination = entry.is_some();
            issued = entry.or(issued);
        }

        if !entered_with_destination && let Some(point) = self.act(&target, nav) {
            issued = Some(point);
        }

        TickOutcome {
            state: self.fsm.current(),
            transition,
            visibility,
            destination_issued: issued,
        }
    }

    /// Records a sighting. Only sightings backed by a ray check or geometry touch the last
    /// known position; the no-hit fallback does not.
    fn observe(&mut self, visibility: &Visibility) {
        match visibility {
            Visibility::Visible(sighting) => {
                if sighting.confirmation != Confirmation::NoHitFallback {
                    self.last_known = Some(sighting.position);
                }
                if !self.target_in_sight {
                    debug!("{} sighted target at {:?}", self.id, sighting.position);
                    self.emit(AgentEvent::TargetSighted {
                        agent: self.id,
                        position: sighting.position,
                    });
                }
                self.target_in_sight = true;
            }
            Visibility::NotVisible(_) => self.target_in_sight = false,
        }
    }

    /// Entry action of `state`.
    fn enter<N>(&mut self, state: AgentState, nav: &mut N) -> Option<cgmath::Vector3<f32>>
    where
        N: Navigator + ?Sized,
    {
        match state {
            AgentState::Patrolling => self.patrol(nav),
            AgentState::Chasing => None,
            AgentState::Searching => {
                self.rejected_samples = 0;
                None
            }
        }
    }

    /// Per-tick action of the current state.
    fn act<N>(&mut self, target: &Pose, nav: &mut N) -> Option<cgmath::Vector3<f32>>
    where
        N: Navigator + ?Sized,
    {
        match self.fsm.current() {
            AgentState::Patrolling => {
                if self.arrived(nav) {
                    self.patrol(nav)
                } else {
                    None
                }
            }
            AgentState::Chasing => Some(self.issue(nav, target.position)),
            AgentState::Searching => {
                if self.fsm.time_in_state() < self.config.search.timeout && self.arrived(nav) {
                    self.search(nav)
                } else {
                    None
                }
            }
        }
    }

    fn arrived<N>(&self, nav: &N) -> bool
    where
        N: Navigator + ?Sized,
    {
        nav.remaining_distance() < self.config.arrival_threshold
    }

    fn patrol<N>(&mut self, nav: &mut N) -> Option<cgmath::Vector3<f32>>
    where
        N: Navigator + ?Sized,
    {
        match next_patrol_destination(&self.config.patrol, &mut self.rng) {
            Some(point) => Some(self.issue(nav, point)),
            None => {
                warn!("{} has no patrol destination, skipping", self.id);
                None
            }
        }
    }

    fn search<N>(&mut self, nav: &mut N) -> Option<cgmath::Vector3<f32>>
    where
        N: Navigator + ?Sized,
    {
        let Some(center) = self.last_known else {
            debug!("{} is searching without a last known position", self.id);
            return None;
        };

        match sample_search_point(&*nav, center, &self.config.search, &mut self.rng) {
            SearchSample::Snapped { point, .. } => {
                self.rejected_samples = 0;
                Some(self.issue(nav, point))
            }
            SearchSample::Rejected { candidate } => {
                self.rejected_samples = self.rejected_samples.saturating_add(1);
                let threshold = self.config.search.rejection_warning_threshold;
                if threshold > 0 && self.rejected_samples % threshold == 0 {
                    warn!(
                        "{} had {} search samples rejected in a row around {:?}",
                        self.id, self.rejected_samples, center
                    );
                } else {
                    debug!("{} search sample {:?} rejected", self.id, candidate);
                }
                self.emit(AgentEvent::SearchSampleRejected {
                    agent: self.id,
                    candidate,
                });
                None
            }
        }
    }

    fn issue<N>(&mut self, nav: &mut N, point: cgmath::Vector3<f32>) -> cgmath::Vector3<f32>
    where
        N: Navigator + ?Sized,
    {
        nav.set_destination(point);
        self.destination = Some(point);
        point
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(events) = &self.events
            && !events.send(event)
        {
            debug!("{} event dropped, no receiver", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NoHitPolicy, PatrolConfig, SearchConfig};
    use crate::events::create_event_channel;
    use crate::test_support::{Blocked, ClearSight, Empty, MockNavigator};
    use cgmath::{MetricSpace, Vector3};
    use warden_core::collaborators::Occluder;
    use warden_core::transforms::SharedPose;

    const STEP: Dt = Dt::from_millis(250);

    struct Rig {
        controller: AgentController,
        target: SharedPose,
        nav: MockNavigator,
        agent: Pose,
    }

    impl Rig {
        fn new(config: AgentConfig) -> Self {
            let target = SharedPose::new(Pose::at(Vector3::new(0.0, 0.0, 15.0)));
            let controller = AgentController::builder(config)
                .id(AgentId(1))
                .target(Arc::new(target.clone()))
                .seed(17)
                .build()
                .expect("valid controller");

            Self {
                controller,
                target,
                nav: MockNavigator::default(),
                agent: Pose::at(Vector3::new(0.0, 0.0, 0.0)),
            }
        }

        fn tick(&mut self, occluder: &dyn Occluder) -> TickOutcome {
            self.controller
                .tick(STEP, &self.agent, &mut self.nav, occluder)
        }

        fn hide_target(&mut self) {
            self.target.set(Pose::at(Vector3::new(0.0, 0.0, 100.0)));
        }
    }

    fn search_config() -> AgentConfig {
        AgentConfig {
            search: SearchConfig {
                timeout: Dt::from_secs(2),
                ..SearchConfig::default()
            },
            ..AgentConfig::default()
        }
    }

    #[test]
    fn test_missing_target_is_fatal() {
        let result = AgentController::builder(AgentConfig::default())
            .id(AgentId(9))
            .build();
        assert!(matches!(result, Err(AgentError::MissingTarget(ref id)) if id == "agent#9"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AgentConfig {
            arrival_threshold: -1.0,
            ..AgentConfig::default()
        };
        let target = SharedPose::default();
        let result = AgentController::builder(config)
            .target(Arc::new(target))
            .build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_start_issues_patrol_destination_once() {
        let mut rig = Rig::new(AgentConfig::default());

        let first = rig.controller.start(&mut rig.nav);
        let second = rig.controller.start(&mut rig.nav);

        assert!(first.is_some());
        assert_eq!(second, None);
        assert_eq!(rig.nav.destinations.len(), 1);
        assert_eq!(rig.controller.destination(), first);
    }

    #[test]
    fn test_first_tick_starts_patrolling() {
        let mut rig = Rig::new(AgentConfig::default());
        rig.hide_target();

        let outcome = rig.tick(&ClearSight::player());

        assert_eq!(outcome.state, AgentState::Patrolling);
        assert_eq!(outcome.transition, None);
        assert!(outcome.destination_issued.is_some());
        assert!(rig.controller.is_started());
    }

    #[test]
    fn test_entry_destination_is_not_overwritten_in_same_tick() {
        /// Always reports arrival, so every arrival check fires.
        #[derive(Default)]
        struct Arrived(Vec<Vector3<f32>>);

        impl Navigator for Arrived {
            fn set_destination(&mut self, point: Vector3<f32>) {
                self.0.push(point);
            }
            fn remaining_distance(&self) -> f32 {
                0.0
            }
            fn sample_position(&self, point: Vector3<f32>, _max: f32) -> Option<Vector3<f32>> {
                Some(point)
            }
        }

        let mut rig = Rig::new(AgentConfig::default());
        rig.hide_target();
        let mut nav = Arrived::default();

        rig.controller
            .tick(STEP, &rig.agent, &mut nav, &ClearSight::player());
        assert_eq!(nav.0.len(), 1);

        rig.controller
            .tick(STEP, &rig.agent, &mut nav, &ClearSight::player());
        assert_eq!(nav.0.len(), 2);
    }

    #[test]
    fn test_patrol_picks_new_destination_on_arrival() {
        let mut rig = Rig::new(AgentConfig::default());
        rig.hide_target();

        rig.tick(&ClearSight::player());
        let outcome = rig.tick(&ClearSight::player());
        assert_eq!(outcome.destination_issued, None);

        rig.nav.arrive();
        let outcome = rig.tick(&ClearSight::player());
        assert!(outcome.destination_issued.is_some());
        assert_eq!(rig.nav.destinations.len(), 2);

        for point in &rig.nav.destinations {
            assert!(point.x.abs() <= 2.5 && point.z.abs() <= 2.5);
        }
    }

    #[test]
    fn test_patrol_to_chase_targets_live_position() {
        let mut rig = Rig::new(AgentConfig::default());

        let outcome = rig.tick(&ClearSight::player());

        assert_eq!(outcome.state, AgentState::Chasing);
        assert_eq!(
            outcome.transition,
            Some(Transition {
                from: AgentState::Patrolling,
                to: AgentState::Chasing
            })
        );
        assert_eq!(outcome.destination_issued, Some(Vector3::new(0.0, 0.0, 15.0)));

        rig.target.set(Pose::at(Vector3::new(2.0, 0.0, 12.0)));
        let outcome = rig.tick(&ClearSight::player());
        assert_eq!(outcome.destination_issued, Some(Vector3::new(2.0, 0.0, 12.0)));
        assert_eq!(rig.nav.last_destination(), Some(Vector3::new(2.0, 0.0, 12.0)));
    }

    #[test]
    fn test_chase_to_search_on_lost_sight() {
        let mut rig = Rig::new(search_config());
        rig.tick(&ClearSight::player());

        let outcome = rig.tick(&Blocked::wall());

        assert_eq!(outcome.state, AgentState::Searching);
        assert_eq!(rig.controller.search_timer(), Some(Dt::ZERO));
        assert_eq!(
            rig.controller.last_known_position(),
            Some(Vector3::new(0.0, 0.0, 15.0))
        );
    }

    #[test]
    fn test_chase_to_patrol_with_patrol_policy() {
        let config = AgentConfig {
            lost_target: LostTargetPolicy::Patrol,
            ..AgentConfig::default()
        };
        let mut rig = Rig::new(config);
        rig.tick(&ClearSight::player());

        let outcome = rig.tick(&Blocked::wall());

        assert_eq!(outcome.state, AgentState::Patrolling);
        let Some(point) = outcome.destination_issued else {
            panic!("patrol entry must issue a destination");
        };
        assert!(point.x.abs() <= 2.5 && point.z.abs() <= 2.5);
    }

    #[test]
    fn test_search_times_out_exactly() {
        let mut rig = Rig::new(search_config());
        rig.tick(&ClearSight::player());
        rig.tick(&Blocked::wall());

        for i in 1..8 {
            let outcome = rig.tick(&Blocked::wall());
            assert_eq!(outcome.state, AgentState::Searching, "tick {}", i);
            assert_eq!(rig.controller.search_timer(), Some(STEP * i));
        }

        let outcome = rig.tick(&Blocked::wall());
        assert_eq!(outcome.state, AgentState::Patrolling);
        assert_eq!(
            outcome.transition,
            Some(Transition {
                from: AgentState::Searching,
                to: AgentState::Patrolling
            })
        );
        assert_eq!(rig.controller.search_timer(), None);
    }

    #[test]
    fn test_sighting_beats_timeout() {
        let mut rig = Rig::new(search_config());
        rig.tick(&ClearSight::player());
        rig.tick(&Blocked::wall());
        for _ in 1..8 {
            rig.tick(&Blocked::wall());
        }

        // The timer reaches the timeout on this tick, but the target is back in view.
        let outcome = rig.tick(&ClearSight::player());
        assert_eq!(outcome.state, AgentState::Chasing);
    }

    #[test]
    fn test_search_timer_resets_on_reentry() {
        let mut rig = Rig::new(search_config());
        rig.tick(&ClearSight::player());
        rig.tick(&Blocked::wall());
        rig.tick(&Blocked::wall());
        rig.tick(&Blocked::wall());
        assert_eq!(rig.controller.search_timer(), Some(STEP * 2));

        rig.tick(&ClearSight::player());
        rig.tick(&Blocked::wall());
        assert_eq!(rig.controller.search_timer(), Some(Dt::ZERO));
    }

    #[test]
    fn test_search_samples_around_last_known_position() {
        let mut rig = Rig::new(search_config());
        rig.tick(&ClearSight::player());
        rig.tick(&Blocked::wall());

        let outcome = rig.tick(&Blocked::wall());
        assert_eq!(outcome.destination_issued, None);

        let last_known = Vector3::new(0.0, 0.0, 15.0);
        for _ in 0..4 {
            rig.nav.arrive();
            let outcome = rig.tick(&Blocked::wall());
            let Some(point) = outcome.destination_issued else {
                panic!("arrival while searching must issue a search point");
            };
            assert!(point.distance(last_known) <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_rejected_search_sample_keeps_destination() {
        let (sender, receiver) = create_event_channel();
        let target = SharedPose::new(Pose::at(Vector3::new(0.0, 0.0, 15.0)));
        let mut controller = AgentController::builder(search_config())
            .target(Arc::new(target.clone()))
            .events(sender)
            .seed(3)
            .build()
            .expect("valid controller");
        let agent = Pose::default();
        let mut nav = MockNavigator {
            reject_samples: true,
            ..MockNavigator::default()
        };

        controller.tick(STEP, &agent, &mut nav, &ClearSight::player());
        controller.tick(STEP, &agent, &mut nav, &Blocked::wall());
        let before = controller.destination();

        nav.arrive();
        let outcome = controller.tick(STEP, &agent, &mut nav, &Blocked::wall());
        assert_eq!(outcome.destination_issued, None);
        assert_eq!(controller.destination(), before);
        assert_eq!(controller.consecutive_rejections(), 1);

        controller.tick(STEP, &agent, &mut nav, &Blocked::wall());
        assert_eq!(controller.consecutive_rejections(), 2);

        let rejected = receiver
            .iter()
            .filter(|e| matches!(e, AgentEvent::SearchSampleRejected { .. }))
            .count();
        assert_eq!(rejected, 2);
    }

    #[test]
    fn test_last_known_position_tracks_and_freezes() {
        let mut rig = Rig::new(search_config());
        assert_eq!(rig.controller.last_known_position(), None);

        rig.tick(&ClearSight::player());
        assert_eq!(
            rig.controller.last_known_position(),
            Some(Vector3::new(0.0, 0.0, 15.0))
        );

        rig.target.set(Pose::at(Vector3::new(1.0, 0.0, 10.0)));
        rig.tick(&ClearSight::player());
        assert_eq!(
            rig.controller.last_known_position(),
            Some(Vector3::new(1.0, 0.0, 10.0))
        );

        rig.hide_target();
        for _ in 0..5 {
            rig.tick(&ClearSight::player());
            assert_eq!(
                rig.controller.last_known_position(),
                Some(Vector3::new(1.0, 0.0, 10.0))
            );
        }
    }

    #[test]
    fn test_no_hit_fallback_keeps_last_known_position() {
        let mut config = search_config();
        config.perception.no_hit_policy = NoHitPolicy::Visible;
        let mut rig = Rig::new(config);

        let outcome = rig.tick(&Empty);
        assert_eq!(outcome.state, AgentState::Chasing);
        assert_eq!(rig.controller.last_known_position(), None);

        rig.tick(&ClearSight::player());
        rig.target.set(Pose::at(Vector3::new(1.0, 0.0, 10.0)));
        let outcome = rig.tick(&Empty);
        assert_eq!(outcome.state, AgentState::Chasing);
        assert_eq!(outcome.destination_issued, Some(Vector3::new(1.0, 0.0, 10.0)));
        assert_eq!(
            rig.controller.last_known_position(),
            Some(Vector3::new(0.0, 0.0, 15.0))
        );
    }

    #[test]
    fn test_events_are_published() {
        let (sender, receiver) = create_event_channel();
        let target = SharedPose::new(Pose::at(Vector3::new(0.0, 0.0, 15.0)));
        let mut controller = AgentController::builder(search_config())
            .id(AgentId(4))
            .target(Arc::new(target))
            .events(sender)
            .seed(1)
            .build()
            .expect("valid controller");
        let mut nav = MockNavigator::default();
        let agent = Pose::default();

        controller.tick(STEP, &agent, &mut nav, &ClearSight::player());
        controller.tick(STEP, &agent, &mut nav, &ClearSight::player());
        controller.tick(STEP, &agent, &mut nav, &Blocked::wall());

        let events = receiver.try_recv_all();
        assert_eq!(
            events,
            vec![
                AgentEvent::TargetSighted {
                    agent: AgentId(4),
                    position: Vector3::new(0.0, 0.0, 15.0)
                },
                AgentEvent::StateChanged {
                    agent: AgentId(4),
                    from: AgentState::Patrolling,
                    to: AgentState::Chasing
                },
                AgentEvent::StateChanged {
                    agent: AgentId(4),
                    from: AgentState::Chasing,
                    to: AgentState::Searching
                },
            ]
        );
    }

    #[test]
    fn test_transition_table() {
        let config = search_config();
        let timeout = config.search.timeout;
        let under = timeout - Dt::from_millis(1);

        for state in AgentState::ALL {
            for visible in [true, false] {
                for elapsed in [Dt::ZERO, under, timeout, timeout * 2] {
                    let expected = match (state, visible) {
                        (AgentState::Patrolling, true) => Some(AgentState::Chasing),
                        (AgentState::Patrolling, false) => None,
                        (AgentState::Chasing, true) => None,
                        (AgentState::Chasing, false) => Some(AgentState::Searching),
                        (AgentState::Searching, true) => Some(AgentState::Chasing),
                        (AgentState::Searching, false) => {
                            (elapsed >= timeout).then_some(AgentState::Patrolling)
                        }
                    };
                    assert_eq!(
                        next_state(state, visible, elapsed, &config),
                        expected,
                        "{} visible={} elapsed={:?}",
                        state,
                        visible,
                        elapsed
                    );
                }
            }
        }
    }

    #[test]
    fn test_transition_table_patrol_policy() {
        let config = AgentConfig {
            lost_target: LostTargetPolicy::Patrol,
            ..AgentConfig::default()
        };
        assert_eq!(
            next_state(AgentState::Chasing, false, Dt::ZERO, &config),
            Some(AgentState::Patrolling)
        );
    }

    #[test]
    fn test_waypoint_patrol() {
        let waypoints = vec![Vector3::new(8.0, 0.0, 8.0), Vector3::new(-8.0, 0.0, 8.0)];
        let config = AgentConfig {
            patrol: PatrolConfig::Waypoints(waypoints.clone()),
            ..AgentConfig::default()
        };
        let mut rig = Rig::new(config);
        rig.hide_target();

        for _ in 0..6 {
            rig.nav.arrive();
            rig.tick(&ClearSight::player());
        }

        assert!(rig.nav.destinations.iter().all(|d| waypoints.contains(d)));
    }

    #[test]
    fn test_debug_overlay_reflects_controller() {
        let mut rig = Rig::new(AgentConfig::default());
        rig.tick(&ClearSight::player());

        let overlay = rig.controller.debug_overlay();

        assert_eq!(overlay.state, AgentState::Chasing);
        assert_eq!(overlay.destination, Some(Vector3::new(0.0, 0.0, 15.0)));
        assert_eq!(overlay.last_known, Some(Vector3::new(0.0, 0.0, 15.0)));
        assert_eq!(overlay.vision_range, 20.0);
    }
}
