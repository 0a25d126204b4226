use crate::fsm::AgentState;
use crossbeam::channel::{Receiver, Sender, unbounded};
use std::fmt;
use std::sync::Arc;

/// Identifier of an agent, unique within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Notable things that happen to an agent during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// The agent switched behavior.
    StateChanged {
        agent: AgentId,
        from: AgentState,
        to: AgentState,
    },
    /// The target became visible after not being visible on the previous tick.
    TargetSighted {
        agent: AgentId,
        position: cgmath::Vector3<f32>,
    },
    /// A search candidate could not be snapped onto the walkable surface.
    SearchSampleRejected {
        agent: AgentId,
        candidate: cgmath::Vector3<f32>,
    },
}

impl AgentEvent {
    /// The agent the event belongs to.
    pub fn agent(&self) -> AgentId {
        match self {
            AgentEvent::StateChanged { agent, .. }
            | AgentEvent::TargetSighted { agent, .. }
            | AgentEvent::SearchSampleRejected { agent, .. } => *agent,
        }
    }
}

/// Receiving end of the agent event channel.
/// Wrapped in Arc to allow sharing across threads.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Arc<Receiver<AgentEvent>>,
}

impl EventReceiver {
    /// Creates a new event receiver with the given channel receiver.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The channel receiver to wrap.
    ///
    /// # Returns
    ///
    /// A new [`EventReceiver`] instance.
    pub fn new(receiver: Receiver<AgentEvent>) -> Self {
        Self {
            receiver: Arc::new(receiver),
        }
    }

    /// Tries to receive an event without blocking.
    ///
    /// # Returns
    ///
    /// The first available event if any.
    pub fn try_recv(&self) -> Option<AgentEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receives all pending events without blocking.
    ///
    /// # Returns
    ///
    /// A vector of all received events, oldest first.
    pub fn try_recv_all(&self) -> Vec<AgentEvent> {
        self.iter().collect()
    }

    /// Returns an iterator over all pending events.
    pub fn iter(&self) -> impl Iterator<Item = AgentEvent> + '_ {
        self.receiver.try_iter()
    }
}

/// Sending end of the agent event channel.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<AgentEvent>,
}

impl EventSender {
    /// Creates a new event sender with the given channel sender.
    pub fn new(sender: Sender<AgentEvent>) -> Self {
        Self { sender }
    }

    /// Sends an event through the channel.
    ///
    /// # Returns
    ///
    /// `true` if the event was sent, `false` when every receiver is gone.
    pub fn send(&self, event: AgentEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Creates a new unbounded event channel.
///
/// # Returns
///
/// A tuple of (sender, receiver).
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    let (sender, receiver) = unbounded();
    (EventSender::new(sender), EventReceiver::new(receiver))
}
