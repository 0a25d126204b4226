//! Core types shared by the warden crates.

#![forbid(unsafe_code)]

pub mod collaborators;
pub mod config;
pub mod math;
pub mod transforms;

/// Type alias for a duration which can be used to represent time intervals.
pub type Dt = std::time::Duration;

/// World-space up axis used for yaw rotations.
pub const UP: cgmath::Vector3<f32> = cgmath::Vector3::new(0.0, 1.0, 0.0);

/// Default facing direction of a freshly spawned pose.
pub const FORWARD: cgmath::Vector3<f32> = cgmath::Vector3::new(0.0, 0.0, 1.0);
