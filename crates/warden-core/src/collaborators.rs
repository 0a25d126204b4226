//! Contracts the agent core consumes from the outside world.
//!
//! The core never plans paths or resolves collisions itself. It talks to a navigation engine,
//! a ray query engine and a target pose source through the traits in this module.

use crate::transforms::Pose;
use std::borrow::Cow;
use std::fmt;

/// Identifies what a collider represents, e.g. `"Player"` or `"Wall"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(Cow<'static, str>);

impl Tag {
    /// Creates a tag from a static string without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The nearest collider hit by a ray.
#[derive(Clone, Debug, PartialEq)]
pub struct RayHit<'a> {
    /// World-space point where the ray entered the collider.
    pub point: cgmath::Vector3<f32>,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Tag of the collider that was hit.
    pub tag: &'a Tag,
}

/// Navigation engine bound to a single moving agent.
pub trait Navigator {
    /// Requests a new destination. Fire and forget; supersedes any previous destination.
    fn set_destination(&mut self, point: cgmath::Vector3<f32>);

    /// Distance left to the current destination, `0.0` when there is none.
    fn remaining_distance(&self) -> f32;

    /// Projects `point` onto the nearest walkable position within `max_distance`.
    ///
    /// # Returns
    ///
    /// `None` when no walkable position lies within the tolerance.
    fn sample_position(
        &self,
        point: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<cgmath::Vector3<f32>>;
}

/// Ray query engine used for line-of-sight tests.
pub trait Occluder {
    /// Casts a ray and returns the nearest hit within `max_distance`.
    ///
    /// # Arguments
    ///
    /// * `origin` - Start of the ray.
    /// * `direction` - Direction of the ray; need not be normalized.
    /// * `max_distance` - Hits further than this are ignored.
    fn raycast_nearest(
        &self,
        origin: cgmath::Vector3<f32>,
        direction: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit<'_>>;
}

/// Read-only access to the pose of the tracked target.
pub trait TargetSource: Send + Sync {
    fn pose(&self) -> Pose;
}

impl<F> TargetSource for F
where
    F: Fn() -> Pose + Send + Sync,
{
    fn pose(&self) -> Pose {
        self()
    }
}
