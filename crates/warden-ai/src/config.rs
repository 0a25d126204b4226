//! Per-agent configuration.
//!
//! Tunables such as the arrival threshold, navmesh snap distance and ray origin offset are
//! fields here, and every behavioral fork is a named policy.

use crate::errors::ConfigError;
use cgmath::Zero;
use warden_core::Dt;
use warden_core::collaborators::Tag;

/// What a line-of-sight ray that hits nothing at all means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoHitPolicy {
    /// The target must be hit for it to count as seen.
    #[default]
    NotVisible,
    /// An empty ray counts as an unobstructed view.
    Visible,
}

/// Where a chasing agent goes when it loses sight of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LostTargetPolicy {
    /// Search around the last known position until the search times out.
    #[default]
    Search,
    /// Return straight to patrolling.
    Patrol,
}

/// Vision cone and line-of-sight parameters.
#[derive(Debug, Clone)]
pub struct PerceptionConfig {
    /// Maximum sight distance in world units.
    pub vision_range: f32,
    /// Half of the full cone angle, in degrees.
    pub vision_half_angle: f32,
    /// Whether a line-of-sight ray is cast after the cone test.
    pub occlusion_enabled: bool,
    /// Tag the nearest ray hit must carry for the target to count as seen.
    pub target_tag: Tag,
    /// Outcome when the line-of-sight ray hits nothing.
    pub no_hit_policy: NoHitPolicy,
    /// Offset from the agent position to the ray origin (eye height).
    pub ray_origin_offset: cgmath::Vector3<f32>,
    /// Reports the target as visible, without any test, while it stands exactly on the last
    /// known position.
    pub stationary_target_shortcut: bool,
}

impl PerceptionConfig {
    /// Creates a perception config from a full cone angle in degrees.
    pub fn with_full_angle(vision_range: f32, full_angle: f32) -> Self {
        Self {
            vision_range,
            vision_half_angle: full_angle * 0.5,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.vision_range.is_finite() && self.vision_range > 0.0) {
            return Err(ConfigError::InvalidVisionRange(self.vision_range));
        }
        if !(self.vision_half_angle > 0.0 && self.vision_half_angle <= 180.0) {
            return Err(ConfigError::InvalidVisionAngle(self.vision_half_angle));
        }
        Ok(())
    }
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            vision_range: 20.0,
            vision_half_angle: 60.0,
            occlusion_enabled: true,
            target_tag: Tag::from_static("Player"),
            no_hit_policy: NoHitPolicy::NotVisible,
            ray_origin_offset: cgmath::Vector3::zero(),
            stationary_target_shortcut: false,
        }
    }
}

/// An axis-aligned rectangle in which patrol destinations are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolArea {
    /// World-space center; its height is used for every destination.
    pub center: cgmath::Vector3<f32>,
    /// Extent along the X axis.
    pub width: f32,
    /// Extent along the Z axis.
    pub depth: f32,
}

impl PatrolArea {
    pub fn new(center: cgmath::Vector3<f32>, width: f32, depth: f32) -> Self {
        Self {
            center,
            width,
            depth,
        }
    }
}

/// Where patrol destinations come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PatrolConfig {
    /// Uniformly random points inside a rectangle.
    Area(PatrolArea),
    /// Uniformly random picks, with replacement, from a fixed list.
    Waypoints(Vec<cgmath::Vector3<f32>>),
}

impl PatrolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PatrolConfig::Area(area) => {
                let valid = |v: f32| v.is_finite() && v >= 0.0;
                if !(valid(area.width) && valid(area.depth)) {
                    return Err(ConfigError::InvalidPatrolArea {
                        width: area.width,
                        depth: area.depth,
                    });
                }
                Ok(())
            }
            PatrolConfig::Waypoints(points) => {
                if points.is_empty() {
                    return Err(ConfigError::EmptyPatrolRoute);
                }
                if let Some(index) = points
                    .iter()
                    .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
                {
                    return Err(ConfigError::NonFiniteWaypoint(index));
                }
                Ok(())
            }
        }
    }
}

impl Default for PatrolConfig {
    fn default() -> Self {
        PatrolConfig::Area(PatrolArea::new(cgmath::Vector3::zero(), 5.0, 5.0))
    }
}

/// Post-contact search parameters.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Radius of the sphere around the last known position in which candidates are drawn.
    pub radius: f32,
    /// How long to search before going back to patrolling.
    pub timeout: Dt,
    /// Maximum distance a candidate may be moved to land on the walkable surface.
    pub snap_distance: f32,
    /// Candidates tried per arrival before giving up until the next tick.
    pub attempts_per_tick: u32,
    /// A warning is logged every time this many candidates in a row were rejected.
    /// Zero disables the warning.
    pub rejection_warning_threshold: u32,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidSearchRadius(self.radius));
        }
        if !(self.snap_distance.is_finite() && self.snap_distance > 0.0) {
            return Err(ConfigError::InvalidSnapDistance(self.snap_distance));
        }
        if self.attempts_per_tick == 0 {
            return Err(ConfigError::InvalidSampleAttempts);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            timeout: Dt::from_secs(15),
            snap_distance: 4.0,
            attempts_per_tick: 1,
            rejection_warning_threshold: 120,
        }
    }
}

/// Complete configuration of a single agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub perception: PerceptionConfig,
    pub patrol: PatrolConfig,
    pub search: SearchConfig,
    /// Remaining distance below which a destination counts as reached.
    pub arrival_threshold: f32,
    pub lost_target: LostTargetPolicy,
}

impl AgentConfig {
    /// Checks every parameter, rejecting degenerate values before the simulation starts.
    ///
    /// # Returns
    ///
    /// The first [`ConfigError`] found, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.perception.validate()?;
        self.patrol.validate()?;
        self.search.validate()?;
        if !(self.arrival_threshold.is_finite() && self.arrival_threshold > 0.0) {
            return Err(ConfigError::InvalidArrivalThreshold(self.arrival_threshold));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            perception: PerceptionConfig::default(),
            patrol: PatrolConfig::default(),
            search: SearchConfig::default(),
            arrival_threshold: 0.5,
            lost_target: LostTargetPolicy::Search,
        }
    }
}
