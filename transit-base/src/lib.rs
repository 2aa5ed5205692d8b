//! Offline transit query engine.
//!
//! Ingests stops, bus routes and pairwise road distances, computes
//! per-route statistics, builds a wait+travel weighted transit graph, and
//! persists the whole model as a binary snapshot so a later process can
//! answer statistic and route queries without recomputation.

pub mod catalogue;
pub mod domain;
pub mod graph;
pub mod handler;
pub mod protocol;
pub mod render;
pub mod router;
pub mod snapshot;
