#[allow(unused)]
pub use crate::{
    AgentOverlay, AgentRig, OBSTACLE_TAG, TARGET_TAG, WardenApp,
    errors::{EngineError, EngineResult},
    logging::init_logger,
};
pub use warden_ai::{
    AgentConfig, AgentController, AgentError, AgentEvent, AgentId, AgentState, DebugOverlay,
    LostTargetPolicy, NoHitPolicy, PatrolArea, PatrolConfig, PerceptionConfig, Reason,
    SearchConfig, StateIdentifier, Visibility, is_target_visible,
};
pub use warden_core::{
    Dt,
    collaborators::{Navigator, Occluder, TargetSource},
    config::Config,
    transforms::{Pose, SharedPose},
};
pub use warden_world::{Collider, CollisionWorld, MeshNavigator, NavAgent, NavMesh};
