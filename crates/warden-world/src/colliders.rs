//! # Tagged colliders
//!
//! Axis-aligned boxes that answer the line-of-sight ray queries of the agents. Boxes never
//! rotate; a moving object updates its box center every tick through its handle.

use crate::errors::{WorldError, WorldResult};
use cgmath::InnerSpace;
use warden_core::collaborators::{Occluder, RayHit, Tag};

/// An axis-aligned box with a tag describing what it represents.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub center: cgmath::Vector3<f32>,
    /// Half of the box size along each axis.
    pub half_extents: cgmath::Vector3<f32>,
    pub tag: Tag,
}

impl Collider {
    pub fn new(
        center: cgmath::Vector3<f32>,
        half_extents: cgmath::Vector3<f32>,
        tag: impl Into<Tag>,
    ) -> Self {
        Self {
            center,
            half_extents,
            tag: tag.into(),
        }
    }

    /// Minimum corner of the box.
    pub fn min(&self) -> cgmath::Vector3<f32> {
        self.center - self.half_extents
    }

    /// Maximum corner of the box.
    pub fn max(&self) -> cgmath::Vector3<f32> {
        self.center + self.half_extents
    }

    /// Whether `point` lies inside the box or on its surface.
    pub fn contains(&self, point: cgmath::Vector3<f32>) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&point.x)
            && (min.y..=max.y).contains(&point.y)
            && (min.z..=max.z).contains(&point.z)
    }

    /// Distance along a normalized ray at which it enters the box (slab method).
    ///
    /// # Returns
    ///
    /// `None` when the ray misses the box or enters it beyond `max_distance`. A ray starting
    /// inside the box enters it at `0.0`.
    fn ray_entry(
        &self,
        origin: cgmath::Vector3<f32>,
        direction: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_near = 0.0_f32;
        let mut t_far = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < f32::EPSILON {
                // Parallel to the slab: the ray either always or never lies between its planes.
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }
}

/// Stable reference to a collider inside a [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(usize);

/// All colliders of a scene.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider to the world.
    ///
    /// # Returns
    ///
    /// A handle for later updates, or [`WorldError::InvalidExtents`].
    pub fn add(&mut self, collider: Collider) -> WorldResult<ColliderHandle> {
        let e = collider.half_extents;
        if ![e.x, e.y, e.z].iter().all(|v| v.is_finite() && *v >= 0.0) {
            return Err(WorldError::InvalidExtents([e.x, e.y, e.z]));
        }

        self.colliders.push(collider);
        Ok(ColliderHandle(self.colliders.len() - 1))
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle.0)
    }

    /// Moves a collider so that it is centered on `center`.
    pub fn move_collider(
        &mut self,
        handle: ColliderHandle,
        center: cgmath::Vector3<f32>,
    ) -> WorldResult<()> {
        let collider = self
            .colliders
            .get_mut(handle.0)
            .ok_or(WorldError::UnknownCollider(handle.0))?;
        collider.center = center;
        Ok(())
    }

    pub fn colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl Occluder for CollisionWorld {
    /// Nearest collider along the ray. A collider containing the ray origin is hit at distance
    /// `0.0`; observers carry no collider of their own.
    fn raycast_nearest(
        &self,
        origin: cgmath::Vector3<f32>,
        direction: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit<'_>> {
        let length = direction.magnitude();
        if length <= f32::EPSILON || max_distance < 0.0 {
            return None;
        }
        let direction = direction / length;

        self.colliders
            .iter()
            .filter_map(|collider| {
                collider
                    .ray_entry(origin, direction, max_distance)
                    .map(|t| (collider, t))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(collider, distance)| RayHit {
                point: origin + direction * distance,
                distance,
                tag: &collider.tag,
            })
    }
}
