use crate::collaborators::TargetSource;
use crate::{FORWARD, UP};
use cgmath::{Deg, InnerSpace, Quaternion, Rotation3};
use log::warn;
use std::sync::{Arc, RwLock};

/// Position and facing of an object in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// The position of the object in 3D space.
    pub position: cgmath::Vector3<f32>,
    /// The normalized direction the object is facing.
    pub forward: cgmath::Vector3<f32>,
}

impl Pose {
    /// Creates a new pose facing the given direction.
    ///
    /// # Arguments
    ///
    /// * `position` - The position of the object.
    /// * `forward` - The facing direction, normalized here. A zero vector falls back to +Z.
    ///
    /// # Returns
    ///
    /// A new [`Pose`] instance.
    pub fn new(position: cgmath::Vector3<f32>, forward: cgmath::Vector3<f32>) -> Self {
        let forward = if forward.magnitude2() > f32::EPSILON {
            forward.normalize()
        } else {
            FORWARD
        };

        Self { position, forward }
    }

    /// Creates a new pose facing +Z.
    pub fn at(position: cgmath::Vector3<f32>) -> Self {
        Self {
            position,
            forward: FORWARD,
        }
    }

    /// Creates a pose rotated around the up axis, starting from +Z.
    ///
    /// # Arguments
    ///
    /// * `position` - The position of the object.
    /// * `yaw` - Rotation around +Y; 90 degrees turns +Z into +X.
    ///
    /// # Returns
    ///
    /// A new [`Pose`] instance.
    pub fn with_yaw(position: cgmath::Vector3<f32>, yaw: Deg<f32>) -> Self {
        let rotation = Quaternion::from_axis_angle(UP, yaw);
        Self::new(position, rotation * FORWARD)
    }

    /// Creates a pose at `position` facing `target`.
    pub fn looking_at(position: cgmath::Vector3<f32>, target: cgmath::Vector3<f32>) -> Self {
        Self::new(position, target - position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(cgmath::Vector3::new(0.0, 0.0, 0.0))
    }
}

/// A pose shared between the system that moves an object and the agents observing it.
#[derive(Clone, Debug, Default)]
pub struct SharedPose(Arc<RwLock<Pose>>);

impl SharedPose {
    pub fn new(pose: Pose) -> Self {
        Self(Arc::new(RwLock::new(pose)))
    }

    /// Replaces the stored pose.
    pub fn set(&self, pose: Pose) {
        match self.0.write() {
            Ok(mut guard) => *guard = pose,
            Err(poisoned) => {
                warn!("Shared pose lock was poisoned, overwriting");
                *poisoned.into_inner() = pose
            }
        }
    }

    /// Reads the stored pose.
    pub fn get(&self) -> Pose {
        match self.0.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn!("Shared pose lock was poisoned, reading last value");
                *poisoned.into_inner()
            }
        }
    }
}

impl TargetSource for SharedPose {
    fn pose(&self) -> Pose {
        self.get()
    }
}
