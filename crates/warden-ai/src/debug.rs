//! Read-only geometry for debug visualization. Nothing here draws.

use crate::config::{AgentConfig, PatrolConfig};
use crate::fsm::AgentState;
use cgmath::Deg;
use warden_core::math::rotate_about_up;
use warden_core::transforms::Pose;

/// Extents of the patrol configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum PatrolExtents {
    Area {
        center: cgmath::Vector3<f32>,
        width: f32,
        depth: f32,
    },
    Waypoints(Vec<cgmath::Vector3<f32>>),
}

impl From<&PatrolConfig> for PatrolExtents {
    fn from(patrol: &PatrolConfig) -> Self {
        match patrol {
            PatrolConfig::Area(area) => PatrolExtents::Area {
                center: area.center,
                width: area.width,
                depth: area.depth,
            },
            PatrolConfig::Waypoints(points) => PatrolExtents::Waypoints(points.clone()),
        }
    }
}

/// Snapshot of what a debug renderer needs to draw one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    pub vision_range: f32,
    /// Half of the vision cone angle, in degrees.
    pub vision_half_angle: f32,
    pub patrol: PatrolExtents,
    pub state: AgentState,
    /// Last destination issued to the navigator.
    pub destination: Option<cgmath::Vector3<f32>>,
    pub last_known: Option<cgmath::Vector3<f32>>,
}

impl DebugOverlay {
    pub(crate) fn new(
        config: &AgentConfig,
        state: AgentState,
        destination: Option<cgmath::Vector3<f32>>,
        last_known: Option<cgmath::Vector3<f32>>,
    ) -> Self {
        Self {
            vision_range: config.perception.vision_range,
            vision_half_angle: config.perception.vision_half_angle,
            patrol: PatrolExtents::from(&config.patrol),
            state,
            destination,
            last_known,
        }
    }

    /// The two edges of the vision cone as rays starting at `pose.position`.
    ///
    /// # Returns
    ///
    /// `[left, right]`, each `vision_range` long.
    pub fn cone_edges(&self, pose: &Pose) -> [cgmath::Vector3<f32>; 2] {
        let half = Deg(self.vision_half_angle);
        [
            rotate_about_up(pose.forward, -half) * self.vision_range,
            rotate_about_up(pose.forward, half) * self.vision_range,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerceptionConfig;
    use cgmath::{InnerSpace, Vector3};
    use warden_core::math::angle_between_deg;

    #[test]
    fn test_overlay_reports_config() {
        let config = AgentConfig {
            perception: PerceptionConfig::with_full_angle(12.0, 90.0),
            ..AgentConfig::default()
        };
        let overlay = DebugOverlay::new(&config, AgentState::Searching, None, None);

        assert_eq!(overlay.vision_range, 12.0);
        assert_eq!(overlay.vision_half_angle, 45.0);
        assert_eq!(overlay.state, AgentState::Searching);
        assert_eq!(
            overlay.patrol,
            PatrolExtents::Area {
                center: Vector3::new(0.0, 0.0, 0.0),
                width: 5.0,
                depth: 5.0
            }
        );
    }

    #[test]
    fn test_cone_edges() {
        let overlay = DebugOverlay::new(&AgentConfig::default(), AgentState::Patrolling, None, None);
        let pose = Pose::at(Vector3::new(4.0, 0.0, 4.0));

        let [left, right] = overlay.cone_edges(&pose);

        assert!((left.magnitude() - 20.0).abs() < 1e-4);
        assert!((right.magnitude() - 20.0).abs() < 1e-4);
        assert!((angle_between_deg(pose.forward, left) - 60.0).abs() < 1e-3);
        assert!((angle_between_deg(pose.forward, right) - 60.0).abs() < 1e-3);
        assert!((angle_between_deg(left, right) - 120.0).abs() < 1e-3);
    }
}
