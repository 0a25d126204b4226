//! # Perception
//!
//! Decides whether the tracked target can be seen from an agent's pose. The test runs in order
//! of cost and stops at the first failing stage:
//!
//! 1. **Distance** against the vision range.
//! 2. **Angle** between the agent's forward vector and the direction to the target.
//! 3. **Occlusion**, a single ray whose nearest hit must be the target itself.
//!
//! The query is pure. Remembering where the target was seen is the caller's job.

use crate::config::{NoHitPolicy, PerceptionConfig};
use cgmath::InnerSpace;
use warden_core::collaborators::{Occluder, Tag};
use warden_core::math::{angle_between_deg, bits_eq};
use warden_core::transforms::Pose;

/// Slack added to the half-angle so a target exactly on the cone edge survives float rounding.
pub const ANGLE_TOLERANCE_DEG: f32 = 1e-3;

/// How a sighting was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Target stands exactly on the last known position and the shortcut is enabled.
    Stationary,
    /// Target and agent occupy the same point.
    Coincident,
    /// Inside the cone with occlusion testing disabled.
    InsideCone,
    /// The nearest ray hit was the target.
    LineOfSight,
    /// The ray hit nothing and the no-hit policy accepts that.
    NoHitFallback,
}

/// Why the target could not be seen.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    /// Farther than the vision range.
    OutOfRange { distance: f32 },
    /// Outside the vision cone.
    OutsideCone { angle: f32 },
    /// Something else was hit first.
    Occluded { by: Tag, distance: f32 },
    /// The ray hit nothing and the no-hit policy rejects that.
    NoLineOfSight,
}

/// A confirmed sighting of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Target position at the moment of the sighting.
    pub position: cgmath::Vector3<f32>,
    /// Distance from the agent to the target.
    pub distance: f32,
    pub confirmation: Confirmation,
}

/// Result of a visibility query.
#[derive(Debug, Clone, PartialEq)]
pub enum Visibility {
    Visible(Sighting),
    NotVisible(Reason),
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible(_))
    }

    /// The sighting, when the target was seen.
    pub fn sighting(&self) -> Option<&Sighting> {
        match self {
            Visibility::Visible(sighting) => Some(sighting),
            Visibility::NotVisible(_) => None,
        }
    }

    /// The failure reason, when the target was not seen.
    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Visibility::Visible(_) => None,
            Visibility::NotVisible(reason) => Some(reason),
        }
    }
}

/// Checks whether `target` can be seen from `agent`.
///
/// # Arguments
///
/// * `agent` - Pose of the observer.
/// * `target` - Pose of the tracked target.
/// * `config` - Vision cone and line-of-sight parameters.
/// * `occluder` - Ray query engine used for the occlusion stage.
/// * `last_known` - Last recorded sighting, only consulted by the stationary shortcut.
///
/// # Returns
///
/// [`Visibility::Visible`] with the sighting, or [`Visibility::NotVisible`] with the stage that
/// rejected the target.
pub fn is_target_visible<O>(
    agent: &Pose,
    target: &Pose,
    config: &PerceptionConfig,
    occluder: &O,
    last_known: Option<cgmath::Vector3<f32>>,
) -> Visibility
where
    O: Occluder + ?Sized,
{
    let to_target = target.position - agent.position;
    let distance = to_target.magnitude();

    if config.stationary_target_shortcut
        && let Some(last_known) = last_known
        && bits_eq(last_known, target.position)
    {
        return visible(target, distance, Confirmation::Stationary);
    }

    if distance > config.vision_range {
        return Visibility::NotVisible(Reason::OutOfRange { distance });
    }

    if distance <= f32::EPSILON {
        return visible(target, distance, Confirmation::Coincident);
    }

    let angle = angle_between_deg(agent.forward, to_target);
    if angle > config.vision_half_angle + ANGLE_TOLERANCE_DEG {
        return Visibility::NotVisible(Reason::OutsideCone { angle });
    }

    if !config.occlusion_enabled {
        return visible(target, distance, Confirmation::InsideCone);
    }

    line_of_sight(agent, target, config, occluder, distance)
}

/// Casts the occlusion ray from the agent's eye toward the target.
fn line_of_sight<O>(
    agent: &Pose,
    target: &Pose,
    config: &PerceptionConfig,
    occluder: &O,
    distance: f32,
) -> Visibility
where
    O: Occluder + ?Sized,
{
    let origin = agent.position + config.ray_origin_offset;
    let ray = target.position - origin;
    let ray_length = ray.magnitude();

    if ray_length <= f32::EPSILON {
        return visible(target, distance, Confirmation::Coincident);
    }

    match occluder.raycast_nearest(origin, ray, ray_length) {
        Some(hit) if *hit.tag == config.target_tag => {
            visible(target, distance, Confirmation::LineOfSight)
        }
        Some(hit) => Visibility::NotVisible(Reason::Occluded {
            by: hit.tag.clone(),
            distance: hit.distance,
        }),
        None => match config.no_hit_policy {
            NoHitPolicy::Visible => visible(target, distance, Confirmation::NoHitFallback),
            NoHitPolicy::NotVisible => Visibility::NotVisible(Reason::NoLineOfSight),
        },
    }
}

fn visible(target: &Pose, distance: f32, confirmation: Confirmation) -> Visibility {
    Visibility::Visible(Sighting {
        position: target.position,
        distance,
        confirmation,
    })
}
