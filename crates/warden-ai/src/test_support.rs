//! Collaborator doubles shared by the unit tests of this crate.

use cgmath::{InnerSpace, Vector3};
use warden_core::collaborators::{Navigator, Occluder, RayHit, Tag};

/// Every ray reaches its full length and hits a collider with the given tag there.
pub struct ClearSight {
    tag: Tag,
}

impl ClearSight {
    pub fn player() -> Self {
        Self {
            tag: Tag::from_static("Player"),
        }
    }
}

impl Occluder for ClearSight {
    fn raycast_nearest(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit<'_>> {
        Some(RayHit {
            point: origin + direction.normalize() * max_distance,
            distance: max_distance,
            tag: &self.tag,
        })
    }
}

/// Every ray stops halfway at a collider with the given tag.
pub struct Blocked {
    tag: Tag,
}

impl Blocked {
    pub fn wall() -> Self {
        Self {
            tag: Tag::from_static("Wall"),
        }
    }
}

impl Occluder for Blocked {
    fn raycast_nearest(
        &self,
        origin: Vector3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit<'_>> {
        let distance = max_distance * 0.5;
        Some(RayHit {
            point: origin + direction.normalize() * distance,
            distance,
            tag: &self.tag,
        })
    }
}

/// Nothing to hit anywhere.
pub struct Empty;

impl Occluder for Empty {
    fn raycast_nearest(
        &self,
        _origin: Vector3<f32>,
        _direction: Vector3<f32>,
        _max_distance: f32,
    ) -> Option<RayHit<'_>> {
        None
    }
}

/// Records destinations; remaining distance is set by hand to simulate arrival.
#[derive(Debug, Default)]
pub struct MockNavigator {
    pub destinations: Vec<Vector3<f32>>,
    pub remaining: f32,
    /// When set, every sample is rejected.
    pub reject_samples: bool,
}

impl MockNavigator {
    pub fn last_destination(&self) -> Option<Vector3<f32>> {
        self.destinations.last().copied()
    }

    /// Pretends the agent reached its destination.
    pub fn arrive(&mut self) {
        self.remaining = 0.0;
    }
}

impl Navigator for MockNavigator {
    fn set_destination(&mut self, point: Vector3<f32>) {
        self.destinations.push(point);
        self.remaining = 1000.0;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn sample_position(&self, point: Vector3<f32>, _max_distance: f32) -> Option<Vector3<f32>> {
        if self.reject_samples { None } else { Some(point) }
    }
}
