//! Route statistics computed at bus insertion.

use std::collections::BTreeSet;

use crate::domain::{RouteStats, StopId};

use super::Catalogue;

/// Compute the aggregate statistics for a stop sequence.
///
/// A loop route is walked once over its stored sequence. A round trip walks
/// every adjacent pair in both directions (road distances are looked up
/// directed, so asymmetric legs are honoured) and doubles the great-circle
/// length; its effective path is `2n − 1` stops.
///
/// `curvature` is the plain IEEE quotient: a route whose stops are all
/// co-located has zero geographic length and yields NaN.
pub(super) fn route_stats(catalogue: &Catalogue, stops: &[StopId], is_loop: bool) -> RouteStats {
    let mut road_length = 0.0;
    let mut geo_length = 0.0;

    for pair in stops.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let leg_geo = catalogue
            .stop(from)
            .coordinates
            .great_circle_to(&catalogue.stop(to).coordinates);
        if is_loop {
            road_length += f64::from(catalogue.distance(from, to));
            geo_length += leg_geo;
        } else {
            road_length +=
                f64::from(catalogue.distance(from, to)) + f64::from(catalogue.distance(to, from));
            geo_length += leg_geo * 2.0;
        }
    }

    let stop_count = if is_loop || stops.is_empty() {
        stops.len()
    } else {
        stops.len() * 2 - 1
    };
    let unique_stop_count = stops.iter().collect::<BTreeSet<_>>().len();

    RouteStats {
        stop_count,
        unique_stop_count,
        road_length,
        curvature: road_length / geo_length,
    }
}
