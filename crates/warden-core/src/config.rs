use crate::Dt;

/// Simulation driver configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name used in log output.
    pub name: &'static str,
    /// Fixed simulation rate in ticks per second.
    pub tick_rate: u32,
    /// Seed for every agent RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Number of ticks to run before stopping; `None` runs until stopped.
    pub max_ticks: Option<u64>,
}

impl Config {
    /// The fixed time step derived from the tick rate.
    ///
    /// # Returns
    ///
    /// The duration of a single tick. A zero tick rate is clamped to one tick per second.
    pub fn tick_interval(&self) -> Dt {
        Dt::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: "Warden",
            tick_rate: 60,
            seed: None,
            max_ticks: None,
        }
    }
}
