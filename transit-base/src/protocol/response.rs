//! Response document DTOs.

use serde::Serialize;

use crate::router::{Route, RouteLeg};

/// One record of the response array, tagged by `request_id`.
///
/// Query-level failures are values (`Error` records), never errors: a
/// batch always produces exactly one record per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatResponse {
    BusStats(BusStatsResponse),
    StopBuses(StopBusesResponse),
    Route(RouteResponse),
    Map(MapResponse),
    Error(ErrorResponse),
}

impl StatResponse {
    /// The `not found` record for a query naming an unknown entity.
    pub fn not_found(request_id: i64) -> Self {
        Self::Error(ErrorResponse {
            request_id,
            error_message: "not found".to_owned(),
        })
    }
}

/// Statistics of one bus route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusStatsResponse {
    pub request_id: i64,
    pub curvature: f64,
    pub route_length: f64,
    pub stop_count: usize,
    pub unique_stop_count: usize,
}

/// The buses serving one stop, name-ordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopBusesResponse {
    pub request_id: i64,
    pub buses: Vec<String>,
}

/// A found route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResponse {
    pub request_id: i64,
    pub total_time: f64,
    pub items: Vec<RouteItem>,
}

/// One leg of a route answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait { stop_name: String, time: f64 },
    Bus { bus: String, span_count: usize, time: f64 },
}

/// A rendered map payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapResponse {
    pub request_id: i64,
    pub map: String,
}

/// A query that could not be answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub request_id: i64,
    pub error_message: String,
}

impl RouteResponse {
    /// Flatten a router answer into response items.
    pub fn from_route(request_id: i64, route: Route) -> Self {
        let items = route
            .legs
            .into_iter()
            .map(|leg| match leg {
                RouteLeg::Wait { stop, time } => RouteItem::Wait {
                    stop_name: stop,
                    time,
                },
                RouteLeg::Ride { bus, span, time } => RouteItem::Bus {
                    bus,
                    span_count: span,
                    time,
                },
            })
            .collect();
        Self {
            request_id,
            total_time: route.total_time,
            items,
        }
    }
}
