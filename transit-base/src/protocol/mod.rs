//! The textual request/response documents.
//!
//! One JSON object comes in (entity descriptions, configuration blocks and
//! a batch of queries); one JSON array goes out (one record per query).
//! Everything here is serde DTOs plus the two-phase ingestion that turns
//! `base_requests` into a populated catalogue.

mod request;
mod response;

pub use request::{
    BaseRequest, BusRequest, RequestDocument, SnapshotSettings, StatKind, StatRequest,
    StopRequest, populate,
};
pub use response::{
    BusStatsResponse, ErrorResponse, MapResponse, RouteItem, RouteResponse, StatResponse,
    StopBusesResponse,
};
