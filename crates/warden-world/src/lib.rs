//! Reference implementations of the collaborators warden agents consume: tagged box colliders
//! for line of sight, a grid navmesh for snapping, and straight-line navigation agents.

#![forbid(unsafe_code)]

pub mod colliders;
pub mod errors;
pub mod nav_agent;
pub mod navmesh;

pub use colliders::{Collider, ColliderHandle, CollisionWorld};
pub use errors::{WorldError, WorldResult};
pub use nav_agent::{MeshNavigator, NavAgent};
pub use navmesh::{GridCell, NavMesh};
