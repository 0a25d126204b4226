use warden_core::Dt;
use warden_macro::StateIdentifier;

/// Trait that state identifiers must implement.
///
/// This trait allows state enums to be logged and compared uniformly. It is usually derived
/// with `#[derive(StateIdentifier)]`, which also provides `Display`.
pub trait StateIdentifier:
    std::fmt::Debug + std::fmt::Display + Clone + Copy + std::hash::Hash + Eq + Send + Sync + 'static
{
    /// Convert to string for logging and debugging purposes.
    ///
    /// # Returns
    ///
    /// A static string representation of the state identifier.
    fn as_str(&self) -> &'static str;
}

/// Behavioral states of an agent.
///
/// The set is closed: every dispatch over it is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StateIdentifier)]
pub enum AgentState {
    /// Wandering between random destinations.
    #[default]
    Patrolling,
    /// Following the live position of a visible target.
    Chasing,
    /// Visiting random points around the last known target position.
    Searching,
}

impl AgentState {
    /// All states, in declaration order.
    pub const ALL: [AgentState; 3] = [
        AgentState::Patrolling,
        AgentState::Chasing,
        AgentState::Searching,
    ];
}

/// A change of state performed by [`StateMachine::transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S: StateIdentifier> {
    pub from: S,
    pub to: S,
}

/// Flat finite state machine driven by simulation time.
///
/// The machine only tracks which state is active and for how long; behavior lives with the
/// owner, which matches on [`StateMachine::current`]. Time is advanced explicitly with
/// [`StateMachine::update`] so that runs are reproducible.
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateIdentifier = AgentState> {
    /// Current active state.
    current: S,
    /// Previously active state.
    previous: Option<S>,
    /// Simulation time accumulated since the current state was entered.
    time_in_state: Dt,
    /// Number of transitions performed so far.
    transitions: u64,
}

impl<S: StateIdentifier> StateMachine<S> {
    /// Create a new state machine in the given initial state.
    ///
    /// # Arguments
    ///
    /// * `initial` - The state to start in.
    ///
    /// # Returns
    ///
    /// A new [`StateMachine`] instance.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            time_in_state: Dt::ZERO,
            transitions: 0,
        }
    }

    /// Get the current state.
    pub fn current(&self) -> S {
        self.current
    }

    /// Get the previous state, if any transition has happened.
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Time spent in the current state.
    pub fn time_in_state(&self) -> Dt {
        self.time_in_state
    }

    /// Number of transitions performed since creation.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Advance the time spent in the current state.
    ///
    /// # Arguments
    ///
    /// * `dt` - The duration of the tick.
    pub fn update(&mut self, dt: Dt) {
        self.time_in_state = self.time_in_state.saturating_add(dt);
    }

    /// Move to a different state and reset the time spent in state.
    ///
    /// # Arguments
    ///
    /// * `next` - The state to enter.
    ///
    /// # Returns
    ///
    /// The performed [`Transition`], or `None` when `next` is already the current state.
    pub fn transition_to(&mut self, next: S) -> Option<Transition<S>> {
        if next == self.current {
            return None;
        }

        let transition = Transition {
            from: self.current,
            to: next,
        };

        self.previous = Some(self.current);
        self.current = next;
        self.time_in_state = Dt::ZERO;
        self.transitions += 1;

        Some(transition)
    }
}

impl<S: StateIdentifier + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
