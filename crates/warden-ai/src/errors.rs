use thiserror::Error;

/// Errors raised while validating an agent configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Vision range must be a positive, finite distance.
    #[error("Vision range must be positive and finite, got {0}")]
    InvalidVisionRange(f32),
    /// Vision half-angle must lie in (0, 180] degrees.
    #[error("Vision half-angle must be in (0, 180] degrees, got {0}")]
    InvalidVisionAngle(f32),
    /// Search radius must be a positive, finite distance.
    #[error("Search radius must be positive and finite, got {0}")]
    InvalidSearchRadius(f32),
    /// Navmesh snap distance must be a positive, finite distance.
    #[error("Navmesh snap distance must be positive and finite, got {0}")]
    InvalidSnapDistance(f32),
    /// Arrival threshold must be a positive, finite distance.
    #[error("Arrival threshold must be positive and finite, got {0}")]
    InvalidArrivalThreshold(f32),
    /// At least one search sample must be attempted per tick.
    #[error("Search sample attempts per tick must be at least 1")]
    InvalidSampleAttempts,
    /// Patrol area extents must be non-negative and finite.
    #[error("Patrol area extents must be non-negative and finite, got {width} x {depth}")]
    InvalidPatrolArea { width: f32, depth: f32 },
    /// A patrol route needs at least one waypoint.
    #[error("Patrol route has no waypoints")]
    EmptyPatrolRoute,
    /// A patrol waypoint has a NaN or infinite coordinate.
    #[error("Patrol waypoint {0} is not finite")]
    NonFiniteWaypoint(usize),
}

/// Errors raised while building or running an agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The agent was built without a target pose source.
    #[error("Agent {0} has no target pose source")]
    MissingTarget(String),
    /// The agent configuration is degenerate.
    #[error("Invalid agent configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Type alias for a result type that can contain an [`AgentError`].
pub type AgentResult<T> = Result<T, AgentError>;
