//! Query façade over the catalogue and router.
//!
//! Borrows the built model for the duration of a batch and answers one
//! stat request at a time. Unknown names become `not found` records;
//! nothing in here aborts the batch.

use serde_json::Value;
use tracing::trace;

use crate::catalogue::Catalogue;
use crate::protocol::{
    BusStatsResponse, ErrorResponse, MapResponse, RouteResponse, StatKind, StatRequest,
    StatResponse, StopBusesResponse,
};
use crate::render::MapRenderer;
use crate::router::TransitRouter;

/// Answers stat requests against a built (or restored) model.
pub struct RequestHandler<'a> {
    catalogue: &'a Catalogue,
    router: &'a TransitRouter,
    render_settings: &'a Value,
    renderer: Option<&'a dyn MapRenderer>,
}

impl<'a> RequestHandler<'a> {
    pub fn new(
        catalogue: &'a Catalogue,
        router: &'a TransitRouter,
        render_settings: &'a Value,
    ) -> Self {
        Self {
            catalogue,
            router,
            render_settings,
            renderer: None,
        }
    }

    /// Attach a drawing collaborator for `Map` queries.
    pub fn with_renderer(mut self, renderer: &'a dyn MapRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Answer a whole batch, one record per request, in request order.
    pub fn answer_all(&self, requests: &[StatRequest]) -> Vec<StatResponse> {
        requests.iter().map(|request| self.answer(request)).collect()
    }

    /// Answer a single stat request.
    pub fn answer(&self, request: &StatRequest) -> StatResponse {
        trace!(id = request.id, "answering stat request");
        match &request.kind {
            StatKind::Bus { name } => self.bus_stats(request.id, name),
            StatKind::Stop { name } => self.stop_buses(request.id, name),
            StatKind::Route { from, to } => self.route(request.id, from, to),
            StatKind::Map => self.map(request.id),
        }
    }

    fn bus_stats(&self, id: i64, name: &str) -> StatResponse {
        match self.catalogue.find_bus(name) {
            Some(bus_id) => {
                let stats = self.catalogue.bus(bus_id).stats;
                StatResponse::BusStats(BusStatsResponse {
                    request_id: id,
                    curvature: stats.curvature,
                    route_length: stats.road_length,
                    stop_count: stats.stop_count,
                    unique_stop_count: stats.unique_stop_count,
                })
            }
            None => StatResponse::not_found(id),
        }
    }

    fn stop_buses(&self, id: i64, name: &str) -> StatResponse {
        if self.catalogue.find_stop(name).is_none() {
            return StatResponse::not_found(id);
        }
        StatResponse::StopBuses(StopBusesResponse {
            request_id: id,
            buses: self
                .catalogue
                .buses_serving(name)
                .into_iter()
                .map(str::to_owned)
                .collect(),
        })
    }

    fn route(&self, id: i64, from: &str, to: &str) -> StatResponse {
        match self.router.find_route(from, to) {
            Some(route) => StatResponse::Route(RouteResponse::from_route(id, route)),
            None => StatResponse::not_found(id),
        }
    }

    fn map(&self, id: i64) -> StatResponse {
        match self.renderer {
            Some(renderer) => StatResponse::Map(MapResponse {
                request_id: id,
                map: renderer.render(self.catalogue, self.render_settings),
            }),
            None => StatResponse::Error(ErrorResponse {
                request_id: id,
                error_message: "map renderer is not configured".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::protocol::RouteItem;
    use crate::router::RoutingConfig;
    use approx::assert_relative_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn request(id: i64, kind: StatKind) -> StatRequest {
        StatRequest { id, kind }
    }

    fn build_model() -> (Catalogue, TransitRouter) {
        let mut catalogue = Catalogue::new();
        catalogue.add_stop("A", Coordinates::new(0.0, 0.0));
        catalogue.add_stop("B", Coordinates::new(0.0, 1.0));
        catalogue.set_distance("A", "B", 1000).unwrap();
        catalogue.add_bus("1", &names(&["A", "B"]), false).unwrap();
        let router = TransitRouter::build(
            &catalogue,
            RoutingConfig {
                bus_wait_time: 6,
                bus_velocity: 40.0,
            },
        );
        (catalogue, router)
    }

    #[test]
    fn bus_query_reports_cached_stats() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let response = handler.answer(&request(1, StatKind::Bus { name: "1".into() }));
        let StatResponse::BusStats(stats) = response else {
            panic!("expected bus stats, got {response:?}");
        };
        assert_eq!(stats.request_id, 1);
        assert_eq!(stats.stop_count, 3);
        assert_eq!(stats.unique_stop_count, 2);
        assert_relative_eq!(stats.route_length, 2000.0);
    }

    #[test]
    fn stop_query_lists_serving_buses() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let response = handler.answer(&request(2, StatKind::Stop { name: "B".into() }));
        assert_eq!(
            response,
            StatResponse::StopBuses(StopBusesResponse {
                request_id: 2,
                buses: vec!["1".into()],
            })
        );
    }

    #[test]
    fn route_query_returns_wait_then_ride() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let response = handler.answer(&request(
            3,
            StatKind::Route {
                from: "A".into(),
                to: "B".into(),
            },
        ));
        let StatResponse::Route(route) = response else {
            panic!("expected a route, got {response:?}");
        };
        assert_relative_eq!(route.total_time, 7.5);
        assert_eq!(
            route.items,
            vec![
                RouteItem::Wait {
                    stop_name: "A".into(),
                    time: 6.0
                },
                RouteItem::Bus {
                    bus: "1".into(),
                    span_count: 1,
                    time: 1.5
                },
            ]
        );
    }

    #[test]
    fn unknown_names_become_not_found_records() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let requests = [
            request(1, StatKind::Bus { name: "404".into() }),
            request(2, StatKind::Stop { name: "Ghost".into() }),
            request(
                3,
                StatKind::Route {
                    from: "A".into(),
                    to: "Ghost".into(),
                },
            ),
        ];
        for response in handler.answer_all(&requests) {
            assert!(matches!(response, StatResponse::Error(ref e) if e.error_message == "not found"));
        }
    }

    #[test]
    fn batch_answers_keep_request_order() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let responses = handler.answer_all(&[
            request(7, StatKind::Stop { name: "A".into() }),
            request(8, StatKind::Bus { name: "1".into() }),
        ]);
        assert!(matches!(&responses[0], StatResponse::StopBuses(r) if r.request_id == 7));
        assert!(matches!(&responses[1], StatResponse::BusStats(r) if r.request_id == 8));
    }

    #[test]
    fn map_query_without_renderer_is_an_error_record() {
        let (catalogue, router) = build_model();
        let handler = RequestHandler::new(&catalogue, &router, &Value::Null);

        let response = handler.answer(&request(9, StatKind::Map));
        assert!(matches!(
            response,
            StatResponse::Error(ref e) if e.error_message.contains("renderer")
        ));
    }

    #[test]
    fn full_pipeline_answers_survive_the_snapshot() {
        use crate::snapshot::Snapshot;

        // Build side: ingest the document, build the router, persist.
        let document: crate::protocol::RequestDocument = serde_json::from_str(
            r#"{
                "base_requests": [
                    {"type": "Stop", "name": "A", "latitude": 0.0, "longitude": 0.0,
                     "road_distances": {"B": 1000}},
                    {"type": "Stop", "name": "B", "latitude": 0.0, "longitude": 1.0},
                    {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
                ],
                "routing_settings": {"bus_wait_time": 6, "bus_velocity": 40}
            }"#,
        )
        .unwrap();
        let mut catalogue = Catalogue::new();
        crate::protocol::populate(&mut catalogue, &document.base_requests).unwrap();
        let router = TransitRouter::build(&catalogue, document.routing_settings.unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.db");
        Snapshot::capture(&catalogue, &document.render_settings, &router)
            .save(&path)
            .unwrap();

        // Serve side: restore and answer.
        let (served_catalogue, render, served_router) =
            Snapshot::load(&path).unwrap().restore().unwrap();
        let handler = RequestHandler::new(&served_catalogue, &served_router, &render);

        let response = handler.answer(&request(
            1,
            StatKind::Route {
                from: "A".into(),
                to: "B".into(),
            },
        ));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "request_id": 1,
                "total_time": 7.5,
                "items": [
                    {"type": "Wait", "stop_name": "A", "time": 6.0},
                    {"type": "Bus", "bus": "1", "span_count": 1, "time": 1.5}
                ]
            })
        );
    }

    #[test]
    fn map_query_delegates_to_the_renderer() {
        struct StubRenderer;
        impl MapRenderer for StubRenderer {
            fn render(&self, catalogue: &Catalogue, settings: &Value) -> String {
                format!("{} stops, width {}", catalogue.stop_count(), settings["width"])
            }
        }

        let (catalogue, router) = build_model();
        let settings = serde_json::json!({"width": 1200});
        let renderer = StubRenderer;
        let handler =
            RequestHandler::new(&catalogue, &router, &settings).with_renderer(&renderer);

        let response = handler.answer(&request(10, StatKind::Map));
        assert_eq!(
            response,
            StatResponse::Map(MapResponse {
                request_id: 10,
                map: "2 stops, width 1200".into(),
            })
        );
    }
}
