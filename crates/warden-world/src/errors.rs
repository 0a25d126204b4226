use thiserror::Error;

/// Errors raised while building or mutating the reference world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    /// Navmesh cells must have a positive, finite size.
    #[error("Navmesh cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    /// Collider half extents must be non-negative and finite.
    #[error("Collider half extents must be non-negative and finite, got {0:?}")]
    InvalidExtents([f32; 3]),
    /// The collider handle does not belong to this world.
    #[error("Unknown collider handle {0}")]
    UnknownCollider(usize),
    /// Agents must move at a positive, finite speed.
    #[error("Agent speed must be positive and finite, got {0}")]
    InvalidSpeed(f32),
}

/// Type alias for a result type that can contain a [`WorldError`].
pub type WorldResult<T> = Result<T, WorldError>;
