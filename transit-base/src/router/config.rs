//! Routing configuration: the two tunable constants of the transit graph.

use serde::{Deserialize, Serialize};

/// Wait time and vehicle speed, as supplied by the `routing_settings`
/// block of the request document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Minutes spent waiting at a stop before boarding any bus.
    pub bus_wait_time: u32,

    /// Vehicle speed in km/h, used to convert road metres into minutes.
    pub bus_velocity: f64,
}

impl RoutingConfig {
    /// The wait penalty as an edge weight.
    pub fn wait_minutes(&self) -> f64 {
        f64::from(self.bus_wait_time)
    }

    /// Metres travelled per minute at `bus_velocity`.
    pub fn metres_per_minute(&self) -> f64 {
        self.bus_velocity * 1000.0 / 60.0
    }
}
