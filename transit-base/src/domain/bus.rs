//! Bus route record, handle and cached statistics.

use serde::{Deserialize, Serialize};

use super::StopId;

/// Handle to a bus in the catalogue's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusId(pub usize);

/// Aggregate statistics for one bus route.
///
/// Computed exactly once when the bus is inserted, and carried verbatim
/// through snapshots; a reloaded catalogue never recomputes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    /// Number of stops on the effective path (`2n − 1` for a round trip
    /// over `n` stored stops, `n` for a loop).
    pub stop_count: usize,

    /// Number of distinct stop names in the stored sequence.
    pub unique_stop_count: usize,

    /// Road length of the effective path in metres.
    pub road_length: f64,

    /// `road_length / geographic_length`. NaN when the geographic length
    /// is zero (all stops co-located).
    pub curvature: f64,
}

/// A named ordered sequence of stops.
///
/// `is_loop == true` means the stored sequence already ends where it
/// begins; otherwise the vehicle runs the sequence forward and then back
/// along the same stops, and the effective path is `2n − 1` stops long.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub name: String,
    pub stops: Vec<StopId>,
    pub is_loop: bool,
    pub stats: RouteStats,
}

impl Bus {
    /// Length of the effective path in stops.
    pub fn effective_stop_count(&self) -> usize {
        if self.is_loop || self.stops.is_empty() {
            self.stops.len()
        } else {
            self.stops.len() * 2 - 1
        }
    }
}
