//! The transit catalogue: stops, buses, road distances and cached
//! route statistics.
//!
//! All records live in arenas owned by [`Catalogue`] and are addressed by
//! [`StopId`]/[`BusId`] handles; the name indices are `BTreeMap`s so that
//! every output-facing iteration (`stops`, `buses`, `buses_serving`) is
//! name-ordered and therefore deterministic.
//!
//! Ingestion is write-once: stops, then distances, then buses. There is no
//! update or delete. Re-adding a name shadows the earlier record for all
//! subsequent lookups.

mod stats;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{Bus, BusId, Coordinates, RouteStats, Stop, StopId};

/// A referenced stop name could not be resolved at ingestion time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stop \"{stop}\" referenced by {referrer}")]
pub struct UnknownStop {
    /// The name that failed to resolve.
    pub stop: String,

    /// What referenced it (a bus route or a road-distance entry).
    pub referrer: String,
}

/// Entity store for the transit model.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_names: BTreeMap<String, StopId>,
    bus_names: BTreeMap<String, BusId>,
    buses_by_stop: HashMap<StopId, BTreeSet<BusId>>,
    distances: HashMap<(StopId, StopId), u32>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a stop, shadowing any earlier stop of the same name.
    pub fn add_stop(&mut self, name: impl Into<String>, coordinates: Coordinates) -> StopId {
        let name = name.into();
        let id = StopId(self.stops.len());
        self.stops.push(Stop::new(name.clone(), coordinates));
        self.stop_names.insert(name, id);
        id
    }

    /// Insert a bus route, resolving its stop names and computing its
    /// statistics immediately.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStop`] if any stop name does not resolve.
    pub fn add_bus(
        &mut self,
        name: impl Into<String>,
        stop_names: &[String],
        is_loop: bool,
    ) -> Result<BusId, UnknownStop> {
        let name = name.into();
        let stops = self.resolve_stops(&name, stop_names)?;
        let stats = stats::route_stats(self, &stops, is_loop);
        Ok(self.insert_bus(name, stops, is_loop, stats))
    }

    /// Insert a bus route with statistics supplied verbatim.
    ///
    /// This is the snapshot-reload path: the cached statistics travel with
    /// the snapshot and are never recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStop`] if any stop name does not resolve.
    pub fn add_bus_with_stats(
        &mut self,
        name: impl Into<String>,
        stop_names: &[String],
        is_loop: bool,
        stats: RouteStats,
    ) -> Result<BusId, UnknownStop> {
        let name = name.into();
        let stops = self.resolve_stops(&name, stop_names)?;
        Ok(self.insert_bus(name, stops, is_loop, stats))
    }

    /// Look up a stop by name.
    pub fn find_stop(&self, name: &str) -> Option<StopId> {
        self.stop_names.get(name).copied()
    }

    /// Look up a bus by name.
    pub fn find_bus(&self, name: &str) -> Option<BusId> {
        self.bus_names.get(name).copied()
    }

    /// The stop record behind a handle issued by this catalogue.
    pub fn stop(&self, id: StopId) -> &Stop {
        &self.stops[id.0]
    }

    /// The bus record behind a handle issued by this catalogue.
    pub fn bus(&self, id: BusId) -> &Bus {
        &self.buses[id.0]
    }

    /// Record the directed road distance between two stops, in metres.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStop`] if either name does not resolve.
    pub fn set_distance(&mut self, from: &str, to: &str, metres: u32) -> Result<(), UnknownStop> {
        let referrer = || format!("road distance {from} -> {to}");
        let from_id = self.find_stop(from).ok_or_else(|| UnknownStop {
            stop: from.to_owned(),
            referrer: referrer(),
        })?;
        let to_id = self.find_stop(to).ok_or_else(|| UnknownStop {
            stop: to.to_owned(),
            referrer: referrer(),
        })?;
        self.distances.insert((from_id, to_id), metres);
        Ok(())
    }

    /// Directed road distance in metres.
    ///
    /// Falls back to the opposite direction when `(from, to)` was never
    /// recorded, and to `0` when neither direction was. The zero default is
    /// deliberate and matches the ingestion format, where distances are
    /// optional, but it means "no recorded distance" is indistinguishable
    /// from "co-located stops" at this level.
    pub fn distance(&self, from: StopId, to: StopId) -> u32 {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .unwrap_or(0)
    }

    /// Names of the buses serving a stop, name-ordered.
    ///
    /// Empty for an unknown stop as well as for a known but unserved one;
    /// callers that need to tell those apart check [`Self::find_stop`]
    /// first.
    pub fn buses_serving(&self, stop_name: &str) -> Vec<&str> {
        let Some(id) = self.find_stop(stop_name) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .buses_by_stop
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&bus| self.buses[bus.0].name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// All stops, name-ordered. Shadowed records are not visited.
    pub fn stops(&self) -> impl Iterator<Item = (StopId, &Stop)> {
        self.stop_names.values().map(|&id| (id, &self.stops[id.0]))
    }

    /// All buses, name-ordered.
    pub fn buses(&self) -> impl Iterator<Item = (BusId, &Bus)> {
        self.bus_names.values().map(|&id| (id, &self.buses[id.0]))
    }

    /// Number of distinct stop names.
    pub fn stop_count(&self) -> usize {
        self.stop_names.len()
    }

    /// Number of distinct bus names.
    pub fn bus_count(&self) -> usize {
        self.bus_names.len()
    }

    fn resolve_stops(&self, bus: &str, names: &[String]) -> Result<Vec<StopId>, UnknownStop> {
        names
            .iter()
            .map(|name| {
                self.find_stop(name).ok_or_else(|| UnknownStop {
                    stop: name.clone(),
                    referrer: format!("bus \"{bus}\""),
                })
            })
            .collect()
    }

    fn insert_bus(
        &mut self,
        name: String,
        stops: Vec<StopId>,
        is_loop: bool,
        stats: RouteStats,
    ) -> BusId {
        let id = BusId(self.buses.len());
        for &stop in &stops {
            self.buses_by_stop.entry(stop).or_default().insert(id);
        }
        self.buses.push(Bus {
            name: name.clone(),
            stops,
            is_loop,
            stats,
        });
        self.bus_names.insert(name, id);
        id
    }
}
