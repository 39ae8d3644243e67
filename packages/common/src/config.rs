use std::time::Duration;

use serde::Deserialize;

/// Live clock configuration shared by the server and the CLI.
#[derive(Debug, Deserialize, Clone)]
pub struct ClockConfig {
    /// Milliseconds between two recomputations of a live contest. Default: 1000.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl ClockConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}
