use common::{
    bandung, create_test_poi, jakarta, jakarta_bounds, leg, MockGeocoder, MockPoiSource,
    MockRoutingProvider,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use waymark::db::{InMemoryMarkerRepository, MarkerRepository};
use waymark::models::{NewMarker, PoiCategory, SearchResult};
use waymark::services::poi_aggregator::{PoiAggregator, PoiLoadOutcome};
use waymark::services::route_planner::RoutePlanner;
use waymark::services::search_index::LocationSearchIndex;
use waymark::services::transport::TransportModeEstimator;
use waymark::session::MapSession;
use waymark::AppError;

mod common;

struct Fixture {
    session: MapSession,
    routing: Arc<MockRoutingProvider>,
    markers: Arc<InMemoryMarkerRepository>,
}

fn setup() -> Fixture {
    let routing = Arc::new(MockRoutingProvider::new(
        leg(120.0, 150.0),
        leg(131.0, 170.0),
        leg(140.0, 190.0),
    ));
    let pois = Arc::new(MockPoiSource::returning(vec![
        create_test_poi(1, "RS Cipto", PoiCategory::Hospital),
        create_test_poi(2, "SMA 1", PoiCategory::School),
    ]));
    let markers = Arc::new(InMemoryMarkerRepository::new());

    let session = MapSession::new(
        Arc::new(RoutePlanner::new(
            routing.clone(),
            TransportModeEstimator::default(),
        )),
        Arc::new(PoiAggregator::new(pois, Duration::from_secs(5), true)),
        Arc::new(LocationSearchIndex::new(Arc::new(MockGeocoder::returning(
            Vec::new(),
        )))),
        markers.clone(),
    );

    Fixture {
        session,
        routing,
        markers,
    }
}

#[tokio::test]
async fn test_second_point_computes_route() {
    let Fixture {
        mut session,
        routing,
        ..
    } = setup();

    assert!(session.on_point_selected(jakarta()).await.is_none());
    assert_eq!(routing.calls(), 0);

    let plan = session.on_point_selected(bandung()).await.unwrap();
    assert_eq!(plan.routes.len(), 3);
    assert_eq!(plan.origin, jakarta());
    assert_eq!(plan.destination, bandung());
    assert_eq!(session.selected_points().len(), 2);
    assert!(session.selected_route().unwrap().is_best);
}

#[tokio::test]
async fn test_third_point_starts_new_pair() {
    let Fixture { mut session, .. } = setup();

    session.on_point_selected(jakarta()).await;
    session.on_point_selected(bandung()).await;
    assert!(session.plan().is_some());

    assert!(session.on_point_selected(bandung()).await.is_none());
    assert!(session.plan().is_none());
    assert_eq!(session.selected_points(), &[bandung()]);
}

#[tokio::test]
async fn test_select_and_clear_route() {
    let Fixture { mut session, .. } = setup();

    assert!(matches!(
        session.select_route(0),
        Err(AppError::InvalidRequest(_))
    ));

    session.on_point_selected(jakarta()).await;
    session.on_point_selected(bandung()).await;

    let route = session.select_route(2).unwrap();
    assert_eq!(route.name, "alternative route 2");
    assert_eq!(session.selected_route().unwrap().name, "alternative route 2");
    assert!(session.select_route(3).is_err());
    assert_eq!(session.selected_route().unwrap().name, "alternative route 2");

    session.clear_route();
    assert!(session.plan().is_none());
    assert!(session.selected_points().is_empty());
    assert!(session.selected_route().is_none());
}

#[tokio::test]
async fn test_viewport_and_category_filter() {
    let Fixture { session, .. } = setup();

    let outcome = session.on_viewport_changed(jakarta_bounds(), 14.0).await;
    assert_eq!(outcome, PoiLoadOutcome::Replaced { count: 2 });

    let hospitals: HashSet<_> = [PoiCategory::Hospital].into_iter().collect();
    assert_eq!(session.visible_pois(Some(&hospitals)).len(), 1);

    let outcome = session.on_viewport_changed(jakarta_bounds(), 8.0).await;
    assert_eq!(outcome, PoiLoadOutcome::Cleared);
    assert!(session.visible_pois(None).is_empty());
}

#[tokio::test]
async fn test_search_and_select_marker_result() {
    let Fixture {
        mut session,
        markers,
        ..
    } = setup();

    let created = markers
        .create(NewMarker {
            lat: -6.1754,
            lng: 106.8272,
            title: "Monas".to_string(),
            description: "National Monument".to_string(),
        })
        .await
        .unwrap();
    session.refresh_markers().await.unwrap();
    session.on_viewport_changed(jakarta_bounds(), 14.0).await;

    let results = session.search("monument").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].marker_id(), Some(created.id));

    let marker = session.select_result(&results[0]).unwrap();
    assert_eq!(marker.id, created.id);
    assert_eq!(session.highlighted_marker().unwrap().title, "Monas");

    let poi_results = session.search("cipto").await;
    assert!(matches!(poi_results[0], SearchResult::Poi { .. }));
    assert!(session.select_result(&poi_results[0]).is_none());

    // Deleting the highlighted marker drops the highlight on refresh
    markers.delete(created.id).await.unwrap();
    session.refresh_markers().await.unwrap();
    assert!(session.highlighted_marker().is_none());
}
