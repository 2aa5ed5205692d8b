//! Request document DTOs and catalogue ingestion.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::catalogue::{Catalogue, UnknownStop};
use crate::domain::Coordinates;
use crate::router::RoutingConfig;

/// The whole request document. Absent blocks deserialize to their empty
/// defaults; which blocks are actually required depends on the mode and is
/// checked by the caller.
#[derive(Debug, Deserialize)]
pub struct RequestDocument {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,

    #[serde(default)]
    pub routing_settings: Option<RoutingConfig>,

    /// Opaque to this crate; handed to the drawing collaborator and
    /// carried through snapshots verbatim.
    #[serde(default)]
    pub render_settings: Value,

    #[serde(default)]
    pub serialization_settings: Option<SnapshotSettings>,

    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}

/// Where the snapshot lives on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSettings {
    pub file: PathBuf,
}

/// One entity description from `base_requests`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRequest),
    Bus(BusRequest),
}

/// A stop plus its outgoing road distances.
#[derive(Debug, Deserialize)]
pub struct StopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Directed distances in metres, keyed by destination stop name.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

/// A bus route. `is_roundtrip == true` means the stop list is already a
/// closed loop; otherwise the vehicle runs it out and back.
#[derive(Debug, Deserialize)]
pub struct BusRequest {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

/// One query from `stat_requests`.
#[derive(Debug, Deserialize)]
pub struct StatRequest {
    pub id: i64,
    #[serde(flatten)]
    pub kind: StatKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatKind {
    Bus { name: String },
    Stop { name: String },
    Route { from: String, to: String },
    Map,
}

/// Fill a catalogue from entity descriptions.
///
/// Ingestion is two-phase on purpose: every stop is inserted before any
/// distance or bus is resolved, so descriptions may reference stops that
/// appear later in the document.
///
/// # Errors
///
/// Returns [`UnknownStop`] when a distance entry or a bus route names a
/// stop that no description defines.
pub fn populate(catalogue: &mut Catalogue, requests: &[BaseRequest]) -> Result<(), UnknownStop> {
    for request in requests {
        if let BaseRequest::Stop(stop) = request {
            catalogue.add_stop(
                &stop.name,
                Coordinates::new(stop.latitude, stop.longitude),
            );
        }
    }

    for request in requests {
        if let BaseRequest::Stop(stop) = request {
            for (to, &metres) in &stop.road_distances {
                catalogue.set_distance(&stop.name, to, metres)?;
            }
        }
    }

    for request in requests {
        if let BaseRequest::Bus(bus) = request {
            catalogue.add_bus(&bus.name, &bus.stops, bus.is_roundtrip)?;
        }
    }

    debug!(
        stops = catalogue.stop_count(),
        buses = catalogue.bus_count(),
        "catalogue populated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_document() {
        let doc: RequestDocument = serde_json::from_str(
            r#"{
                "base_requests": [
                    {
                        "type": "Stop",
                        "name": "Universam",
                        "latitude": 55.587655,
                        "longitude": 37.645687,
                        "road_distances": {"Biryulyovo Tovarnaya": 890}
                    },
                    {
                        "type": "Stop",
                        "name": "Biryulyovo Tovarnaya",
                        "latitude": 55.592028,
                        "longitude": 37.653656
                    },
                    {
                        "type": "Bus",
                        "name": "828",
                        "stops": ["Universam", "Biryulyovo Tovarnaya"],
                        "is_roundtrip": false
                    }
                ],
                "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40},
                "render_settings": {"width": 1200},
                "serialization_settings": {"file": "transit.db"},
                "stat_requests": [
                    {"id": 1, "type": "Bus", "name": "828"},
                    {"id": 2, "type": "Stop", "name": "Universam"},
                    {"id": 3, "type": "Route", "from": "Universam", "to": "Biryulyovo Tovarnaya"},
                    {"id": 4, "type": "Map"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.base_requests.len(), 3);
        assert_eq!(doc.routing_settings.unwrap().bus_wait_time, 6);
        assert_eq!(
            doc.serialization_settings.unwrap().file,
            PathBuf::from("transit.db")
        );
        assert_eq!(doc.stat_requests.len(), 4);
        assert!(matches!(doc.stat_requests[0].kind, StatKind::Bus { .. }));
        assert!(matches!(doc.stat_requests[2].kind, StatKind::Route { .. }));
        assert!(matches!(doc.stat_requests[3].kind, StatKind::Map));
    }

    #[test]
    fn absent_blocks_default_to_empty() {
        let doc: RequestDocument = serde_json::from_str("{}").unwrap();

        assert!(doc.base_requests.is_empty());
        assert!(doc.routing_settings.is_none());
        assert!(doc.serialization_settings.is_none());
        assert!(doc.stat_requests.is_empty());
        assert_eq!(doc.render_settings, Value::Null);
    }

    #[test]
    fn populate_allows_forward_references() {
        // "Marushkino" is referenced by distances and a bus before its own
        // description appears.
        let doc: RequestDocument = serde_json::from_str(
            r#"{
                "base_requests": [
                    {
                        "type": "Bus",
                        "name": "750",
                        "stops": ["Tolstopaltsevo", "Marushkino"],
                        "is_roundtrip": false
                    },
                    {
                        "type": "Stop",
                        "name": "Tolstopaltsevo",
                        "latitude": 55.611087,
                        "longitude": 37.20829,
                        "road_distances": {"Marushkino": 3900}
                    },
                    {
                        "type": "Stop",
                        "name": "Marushkino",
                        "latitude": 55.595884,
                        "longitude": 37.209755
                    }
                ]
            }"#,
        )
        .unwrap();

        let mut catalogue = Catalogue::new();
        populate(&mut catalogue, &doc.base_requests).unwrap();

        let bus = catalogue.bus(catalogue.find_bus("750").unwrap());
        assert_eq!(bus.stats.stop_count, 3);
        assert_eq!(bus.stats.road_length, 7800.0);
    }

    #[test]
    fn populate_fails_fast_on_unknown_reference() {
        let doc: RequestDocument = serde_json::from_str(
            r#"{
                "base_requests": [
                    {"type": "Stop", "name": "A", "latitude": 0, "longitude": 0},
                    {"type": "Bus", "name": "9", "stops": ["A", "Missing"], "is_roundtrip": true}
                ]
            }"#,
        )
        .unwrap();

        let mut catalogue = Catalogue::new();
        let err = populate(&mut catalogue, &doc.base_requests).unwrap_err();
        assert_eq!(err.stop, "Missing");
    }
}
