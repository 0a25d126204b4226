//! Run and manage a warden simulation.

#![forbid(unsafe_code)]

pub mod errors;
pub mod logging;
pub mod prelude;

use crate::errors::{EngineError, EngineResult};
use log::{debug, info};
use rayon::prelude::*;
use std::sync::Arc;
use warden_ai::config::AgentConfig;
use warden_ai::controller::{AgentController, TickOutcome};
use warden_ai::debug::DebugOverlay;
use warden_ai::events::{AgentEvent, AgentId, EventReceiver, EventSender, create_event_channel};
use warden_ai::fsm::AgentState;
use warden_core::Dt;
use warden_core::collaborators::Tag;
use warden_core::config::Config;
use warden_core::transforms::{Pose, SharedPose};
use warden_world::colliders::{Collider, ColliderHandle, CollisionWorld};
use warden_world::nav_agent::{MeshNavigator, NavAgent};
use warden_world::navmesh::NavMesh;

/// Tag carried by the target's collider.
pub const TARGET_TAG: Tag = Tag::from_static("Player");

/// Tag carried by static obstacles.
pub const OBSTACLE_TAG: Tag = Tag::from_static("Wall");

/// Distance at which the target counts as having reached a route point.
const ROUTE_POINT_REACHED: f32 = 0.1;

/// The scripted target the agents look for.
struct TargetRig {
    agent: NavAgent,
    pose: SharedPose,
    collider: ColliderHandle,
    route: Vec<cgmath::Vector3<f32>>,
    next: usize,
}

impl TargetRig {
    /// Walks the route cyclically and publishes the resulting pose.
    fn advance(&mut self, dt: Dt, collisions: &mut CollisionWorld) -> EngineResult<()> {
        if !self.route.is_empty() && self.agent.remaining_distance() < ROUTE_POINT_REACHED {
            self.agent.set_destination(self.route[self.next]);
            self.next = (self.next + 1) % self.route.len();
        }

        self.agent.advance(dt);
        self.publish(collisions)
    }

    fn publish(&self, collisions: &mut CollisionWorld) -> EngineResult<()> {
        self.pose.set(self.agent.pose());
        collisions.move_collider(self.collider, self.agent.position)?;
        Ok(())
    }
}

/// One simulated agent: its controller and the body it steers.
pub struct AgentRig {
    controller: AgentController,
    body: NavAgent,
    last_outcome: Option<TickOutcome>,
}

impl AgentRig {
    pub fn id(&self) -> AgentId {
        self.controller.id()
    }

    pub fn state(&self) -> AgentState {
        self.controller.state()
    }

    pub fn pose(&self) -> Pose {
        self.body.pose()
    }

    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    pub fn body(&self) -> &NavAgent {
        &self.body
    }

    /// Outcome of the most recent tick.
    pub fn last_outcome(&self) -> Option<&TickOutcome> {
        self.last_outcome.as_ref()
    }

    fn tick(&mut self, dt: Dt, navmesh: &NavMesh, collisions: &CollisionWorld) {
        let pose = self.body.pose();
        let mut nav = MeshNavigator::new(&mut self.body, navmesh);
        let outcome = self.controller.tick(dt, &pose, &mut nav, collisions);
        self.last_outcome = Some(outcome);
        self.body.advance(dt);
    }
}

/// Debug geometry of one agent at its current pose.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOverlay {
    pub id: AgentId,
    pub pose: Pose,
    pub overlay: DebugOverlay,
    /// Vision cone edges as rays from `pose.position`.
    pub cone_edges: [cgmath::Vector3<f32>; 2],
}

/// [`WardenApp`] owns the world, the target and every agent, and steps them at a fixed rate.
pub struct WardenApp {
    /// Configuration of the simulation.
    config: Config,
    /// Walkable surface shared by every body.
    navmesh: NavMesh,
    /// Obstacles and the target collider.
    collisions: CollisionWorld,
    target: Option<TargetRig>,
    agents: Vec<AgentRig>,
    event_sender: EventSender,
    event_receiver: EventReceiver,
    /// Number of steps run so far.
    ticks: u64,
}

impl WardenApp {
    /// Creates a simulation over the given navmesh.
    ///
    /// # Arguments
    ///
    /// * `config` - Tick rate, seed and tick budget.
    /// * `navmesh` - Walkable surface; obstacles added later carve it further.
    pub fn new(config: Config, navmesh: NavMesh) -> Self {
        let (event_sender, event_receiver) = create_event_channel();
        Self {
            config,
            navmesh,
            collisions: CollisionWorld::new(),
            target: None,
            agents: Vec::new(),
            event_sender,
            event_receiver,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navmesh(&self) -> &NavMesh {
        &self.navmesh
    }

    pub fn collisions(&self) -> &CollisionWorld {
        &self.collisions
    }

    /// Number of steps run so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Adds a static box that blocks line of sight and is carved out of the navmesh.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the box.
    /// * `half_extents` - Half of the box size along each axis.
    pub fn add_obstacle(
        &mut self,
        center: cgmath::Vector3<f32>,
        half_extents: cgmath::Vector3<f32>,
    ) -> EngineResult<ColliderHandle> {
        let collider = Collider::new(center, half_extents, OBSTACLE_TAG);
        self.navmesh.carve(&collider);
        Ok(self.collisions.add(collider)?)
    }

    /// Places the target. It walks `route` cyclically; an empty route keeps it still.
    ///
    /// # Arguments
    ///
    /// * `spawn` - Initial pose; must be on the navmesh.
    /// * `speed` - Walking speed in world units per second.
    /// * `route` - Points visited in order, then again from the start.
    ///
    /// # Returns
    ///
    /// The shared pose the agents read the target from.
    pub fn set_target(
        &mut self,
        spawn: Pose,
        speed: f32,
        route: Vec<cgmath::Vector3<f32>>,
    ) -> EngineResult<SharedPose> {
        self.ensure_walkable("Target", spawn.position)?;

        let agent = NavAgent::new(spawn, speed)?;
        let pose = SharedPose::new(agent.pose());

        let collider = match self.target.take() {
            Some(previous) => previous.collider,
            None => self.collisions.add(Collider::new(
                spawn.position,
                cgmath::Vector3::new(0.5, 0.5, 0.5),
                TARGET_TAG,
            ))?,
        };

        let target = TargetRig {
            agent,
            pose: pose.clone(),
            collider,
            route,
            next: 0,
        };
        target.publish(&mut self.collisions)?;
        self.target = Some(target);

        info!("Target placed at {:?}", spawn.position);
        Ok(pose)
    }

    /// The target's shared pose, if a target was placed.
    pub fn target_pose(&self) -> Option<SharedPose> {
        self.target.as_ref().map(|target| target.pose.clone())
    }

    /// Moves the target instantly; it resumes its route on the next step.
    pub fn teleport_target(&mut self, position: cgmath::Vector3<f32>) -> EngineResult<()> {
        let target = self
            .target
            .as_mut()
            .ok_or_else(|| EngineError::Configuration("No target placed".to_string()))?;
        target.agent.teleport(position);
        target.publish(&mut self.collisions)
    }

    /// Adds an agent looking for the target.
    ///
    /// # Arguments
    ///
    /// * `config` - Behavior of the agent.
    /// * `spawn` - Initial pose; must be on the navmesh.
    /// * `speed` - Movement speed in world units per second.
    ///
    /// # Returns
    ///
    /// The new agent's id, or [`EngineError::Agent`] when no target was placed yet or the
    /// configuration is invalid.
    pub fn add_agent(&mut self, config: AgentConfig, spawn: Pose, speed: f32) -> EngineResult<AgentId> {
        self.ensure_walkable("Agent", spawn.position)?;

        let id = AgentId(self.agents.len() as u32);
        let mut builder = AgentController::builder(config)
            .id(id)
            .events(self.event_sender.clone());

        if let Some(target) = &self.target {
            builder = builder.target(Arc::new(target.pose.clone()));
        }
        if let Some(seed) = self.config.seed {
            builder = builder.seed(seed.wrapping_add(u64::from(id.0)));
        }

        let controller = builder.build()?;
        let body = NavAgent::new(spawn, speed)?;

        self.agents.push(AgentRig {
            controller,
            body,
            last_outcome: None,
        });

        info!("{} spawned at {:?}", id, spawn.position);
        Ok(id)
    }

    pub fn agents(&self) -> &[AgentRig] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> EngineResult<&AgentRig> {
        self.agents
            .iter()
            .find(|rig| rig.id() == id)
            .ok_or(EngineError::UnknownAgent(id))
    }

    /// Runs one simulation step.
    ///
    /// The target moves first, then every agent ticks in parallel against the same world
    /// snapshot and moves its body.
    ///
    /// # Arguments
    ///
    /// * `dt` - Simulated time of the step.
    ///
    /// # Returns
    ///
    /// The events published by the agents during the step.
    pub fn step(&mut self, dt: Dt) -> EngineResult<Vec<AgentEvent>> {
        if let Some(target) = &mut self.target {
            target.advance(dt, &mut self.collisions)?;
        }

        let navmesh = &self.navmesh;
        let collisions = &self.collisions;
        self.agents
            .par_iter_mut()
            .for_each(|rig| rig.tick(dt, navmesh, collisions));

        self.ticks += 1;

        let events = self.event_receiver.try_recv_all();
        for event in &events {
            debug!("Tick {}: {:?}", self.ticks, event);
        }
        Ok(events)
    }

    /// Steps the simulation at the configured tick rate.
    ///
    /// Stops after `max_ticks` steps, or on Ctrl-C when no budget is configured.
    pub async fn run(&mut self) -> EngineResult<()> {
        let dt = self.config.tick_interval();
        info!(
            "Starting {} with {} agents at {} ticks/s",
            self.config.name,
            self.agents.len(),
            self.config.tick_rate.max(1)
        );

        let mut interval = tokio::time::interval(dt);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            if let Some(max_ticks) = self.config.max_ticks
                && self.ticks >= max_ticks
            {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {
                    self.step(dt)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        info!("{} stopped after {} ticks", self.config.name, self.ticks);
        Ok(())
    }

    /// Debug geometry of every agent.
    pub fn overlays(&self) -> Vec<AgentOverlay> {
        self.agents
            .iter()
            .map(|rig| {
                let pose = rig.pose();
                let overlay = rig.controller.debug_overlay();
                let cone_edges = overlay.cone_edges(&pose);
                AgentOverlay {
                    id: rig.id(),
                    pose,
                    overlay,
                    cone_edges,
                }
            })
            .collect()
    }

    fn ensure_walkable(&self, what: &str, position: cgmath::Vector3<f32>) -> EngineResult<()> {
        if self.navmesh.is_walkable(position) {
            Ok(())
        } else {
            Err(EngineError::Configuration(format!(
                "{} spawn {:?} is not on the navmesh",
                what, position
            )))
        }
    }
}
