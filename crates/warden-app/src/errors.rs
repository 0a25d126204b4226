use thiserror::Error;
use warden_ai::errors::AgentError;
use warden_ai::events::AgentId;
use warden_world::errors::WorldError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("World error: {0}")]
    World(#[from] WorldError),

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
