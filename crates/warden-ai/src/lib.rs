//! Perception-driven patrol, chase and search agents.

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod debug;
pub mod errors;
pub mod events;
pub mod fsm;
pub mod patrol;
pub mod perception;
pub mod search;

#[cfg(test)]
mod test_support;

pub use config::{
    AgentConfig, LostTargetPolicy, NoHitPolicy, PatrolArea, PatrolConfig, PerceptionConfig,
    SearchConfig,
};
pub use controller::{AgentController, AgentControllerBuilder, TickOutcome};
pub use debug::{DebugOverlay, PatrolExtents};
pub use errors::{AgentError, AgentResult, ConfigError};
pub use events::{AgentEvent, AgentId, EventReceiver, EventSender, create_event_channel};
pub use fsm::{AgentState, StateIdentifier, StateMachine, Transition};
pub use perception::{Confirmation, Reason, Sighting, Visibility, is_target_visible};
