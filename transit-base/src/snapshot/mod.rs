//! Binary snapshot codec.
//!
//! A snapshot is one self-contained blob holding the catalogue (with its
//! cached statistics), the opaque render configuration and the already
//! built transit graph. Restoring is structural reassembly only: no
//! statistics are recomputed and no graph is rebuilt, which is what makes
//! reload linear in the model size instead of quadratic in route length.
//!
//! Pairwise road distances are deliberately not persisted: nothing on the
//! serve side derives from them once statistics and graph exist.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalogue::{Catalogue, UnknownStop};
use crate::domain::{Coordinates, RouteStats};
use crate::graph::{DirectedWeightedGraph, VertexId};
use crate::router::{RoutingConfig, TransitRouter};

/// Failure to persist or reload a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file could not be opened for reading. On serve this is
    /// fatal: answering from nothing would silently produce an empty
    /// response set.
    #[error("snapshot file {path:?} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file could not be created.
    #[error("cannot create snapshot file {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blob is not a valid snapshot (or an I/O error mid-stream).
    #[error("malformed snapshot: {0}")]
    Codec(#[from] bincode::Error),

    /// The opaque render block is not valid JSON text.
    #[error("malformed render settings in snapshot: {0}")]
    Render(#[from] serde_json::Error),

    /// The snapshot is internally inconsistent (a bus names a stop the
    /// snapshot does not carry).
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(#[from] UnknownStop),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StopRecord {
    name: String,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BusRecord {
    name: String,
    stops: Vec<String>,
    is_loop: bool,
    stats: RouteStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RouterRecord {
    config: RoutingConfig,
    graph: DirectedWeightedGraph,
    stop_vertices: Vec<(String, VertexId)>,
}

/// The persisted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    stops: Vec<StopRecord>,
    buses: Vec<BusRecord>,
    // bincode is not self-describing, so the opaque render block travels
    // as JSON text rather than as a serde_json::Value.
    render: String,
    router: RouterRecord,
}

impl Snapshot {
    /// Capture the full model. Stop and bus records are emitted
    /// name-ordered, so equal models produce byte-equal snapshots.
    pub fn capture(catalogue: &Catalogue, render: &Value, router: &TransitRouter) -> Self {
        Self {
            stops: catalogue
                .stops()
                .map(|(_, stop)| StopRecord {
                    name: stop.name.clone(),
                    lat: stop.coordinates.lat,
                    lng: stop.coordinates.lng,
                })
                .collect(),
            buses: catalogue
                .buses()
                .map(|(_, bus)| BusRecord {
                    name: bus.name.clone(),
                    stops: bus
                        .stops
                        .iter()
                        .map(|&id| catalogue.stop(id).name.clone())
                        .collect(),
                    is_loop: bus.is_loop,
                    stats: bus.stats,
                })
                .collect(),
            render: render.to_string(),
            router: RouterRecord {
                config: router.config(),
                graph: router.graph().clone(),
                stop_vertices: router
                    .stop_vertices()
                    .iter()
                    .map(|(name, &vertex)| (name.clone(), vertex))
                    .collect(),
            },
        }
    }

    /// Reassemble the catalogue, render settings and router.
    ///
    /// # Errors
    ///
    /// Fails only on an internally inconsistent snapshot; a blob produced
    /// by [`Snapshot::capture`] always restores.
    pub fn restore(self) -> Result<(Catalogue, Value, TransitRouter), SnapshotError> {
        let mut catalogue = Catalogue::new();
        for stop in &self.stops {
            catalogue.add_stop(&stop.name, Coordinates::new(stop.lat, stop.lng));
        }
        for bus in self.buses {
            catalogue.add_bus_with_stats(bus.name, &bus.stops, bus.is_loop, bus.stats)?;
        }

        let render: Value = serde_json::from_str(&self.render)?;

        let stop_vertices: BTreeMap<String, VertexId> =
            self.router.stop_vertices.into_iter().collect();
        let router = TransitRouter::from_parts(self.router.config, self.router.graph, stop_vertices);

        debug!(
            stops = catalogue.stop_count(),
            buses = catalogue.bus_count(),
            edges = router.graph().edge_count(),
            "restored snapshot"
        );
        Ok((catalogue, render, router))
    }

    /// Write the snapshot to a file.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let file = File::create(path).map_err(|source| SnapshotError::Create {
            path: path.to_owned(),
            source,
        })?;
        bincode::serialize_into(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read a snapshot from a file.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::Unavailable`] when the file cannot be opened;
    /// [`SnapshotError::Codec`] when it does not decode.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path).map_err(|source| SnapshotError::Unavailable {
            path: path.to_owned(),
            source,
        })?;
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }
}
