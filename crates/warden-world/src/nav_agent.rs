//! Kinematic navigation agents and their binding to the navmesh.

use crate::errors::{WorldError, WorldResult};
use crate::navmesh::NavMesh;
use cgmath::InnerSpace;
use warden_core::Dt;
use warden_core::collaborators::Navigator;
use warden_core::math::planar;
use warden_core::transforms::Pose;

/// Moves in a straight line toward its destination at a fixed speed.
///
/// There is no path planning: the agent walks straight at its destination and faces the
/// direction it moves in.
#[derive(Debug, Clone)]
pub struct NavAgent {
    pub position: cgmath::Vector3<f32>,
    /// Normalized facing direction.
    pub forward: cgmath::Vector3<f32>,
    /// Movement speed in world units per second.
    speed: f32,
    destination: Option<cgmath::Vector3<f32>>,
}

impl NavAgent {
    /// Creates an idle agent.
    ///
    /// # Arguments
    ///
    /// * `pose` - Spawn position and facing.
    /// * `speed` - Movement speed in world units per second.
    pub fn new(pose: Pose, speed: f32) -> WorldResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(WorldError::InvalidSpeed(speed));
        }

        Ok(Self {
            position: pose.position,
            forward: pose.forward,
            speed,
            destination: None,
        })
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.forward)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn destination(&self) -> Option<cgmath::Vector3<f32>> {
        self.destination
    }

    /// Replaces the current destination.
    pub fn set_destination(&mut self, destination: cgmath::Vector3<f32>) {
        self.destination = Some(destination);
    }

    /// Places the agent at `position` and drops its destination.
    pub fn teleport(&mut self, position: cgmath::Vector3<f32>) {
        self.position = position;
        self.destination = None;
    }

    /// Distance left to the destination, `0.0` without one.
    pub fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| (destination - self.position).magnitude())
    }

    /// Moves toward the destination, stopping exactly on it.
    ///
    /// # Arguments
    ///
    /// * `dt` - Time elapsed since the last update.
    pub fn advance(&mut self, dt: Dt) {
        let Some(destination) = self.destination else {
            return;
        };

        let to_destination = destination - self.position;
        let distance = to_destination.magnitude();
        let step = self.speed * dt.as_secs_f32();

        let heading = planar(to_destination);
        if heading.magnitude2() > f32::EPSILON {
            self.forward = heading.normalize();
        }

        if distance <= step {
            self.position = destination;
        } else {
            self.position += to_destination / distance * step;
        }
    }
}

/// Binds a [`NavAgent`] and a [`NavMesh`] into the navigation contract the agents consume.
pub struct MeshNavigator<'a> {
    agent: &'a mut NavAgent,
    mesh: &'a NavMesh,
}

impl<'a> MeshNavigator<'a> {
    pub fn new(agent: &'a mut NavAgent, mesh: &'a NavMesh) -> Self {
        Self { agent, mesh }
    }
}

impl Navigator for MeshNavigator<'_> {
    fn set_destination(&mut self, point: cgmath::Vector3<f32>) {
        self.agent.set_destination(point);
    }

    fn remaining_distance(&self) -> f32 {
        self.agent.remaining_distance()
    }

    fn sample_position(
        &self,
        point: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<cgmath::Vector3<f32>> {
        self.mesh.sample_position(point, max_distance)
    }
}
