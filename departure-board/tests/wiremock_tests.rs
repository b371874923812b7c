//! Integration tests for the HAFAS client, the refresh cycle and the HTTP
//! surface (wiremock-based)

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use departure_board::board::{BoardConfig, TransferTarget};
use departure_board::cache::BoardCache;
use departure_board::domain::{Mode, RING_DESTINATION};
use departure_board::hafas::{
    Destination, HafasClient, HafasConfig, JourneyQuery, Products, TransitError,
};
use departure_board::web::{AppState, create_router};

const HOME: &str = "900000011102";
const HANSAPLATZ: &str = "900000003101";
const WESTEND: &str = "900000026207";
const BEKASSINENWEG: &str = "900000091156";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn at(base: DateTime<Utc>, mins: i64) -> String {
    (base + Duration::minutes(mins)).to_rfc3339()
}

fn config_for_mock(base_url: &str) -> BoardConfig {
    BoardConfig::default()
        .with_api(HafasConfig::new(base_url))
        .with_inbound(vec![
            TransferTarget::stop("Hansaplatz", HANSAPLATZ, Products::none()),
            TransferTarget::stop("Westend", WESTEND, Products::suburban()),
        ])
        .with_outbound(vec![TransferTarget::stop(
            "Bekassinenweg",
            BEKASSINENWEG,
            Products::bus(),
        )])
}

fn cache_for(config: BoardConfig) -> BoardCache {
    let client = HafasClient::new(&config.api).unwrap();
    BoardCache::new(client, Arc::new(config))
}

fn departure_json(
    base: DateTime<Utc>,
    line: &str,
    product: &str,
    direction: &str,
    mins: i64,
) -> serde_json::Value {
    serde_json::json!({
        "tripId": format!("1|{line}|{mins}"),
        "when": at(base, mins),
        "plannedWhen": at(base, mins),
        "direction": direction,
        "line": { "name": line, "product": product },
    })
}

fn board_json(base: DateTime<Utc>) -> String {
    serde_json::json!({
        "departures": [
            departure_json(base, "U6", "subway", "U Alt-Mariendorf", 2),
            departure_json(base, "U6", "subway", "U Alt-Tegel", 3),
            departure_json(base, "125", "bus", "Frohnau, Invalidensiedlung", 4),
            departure_json(base, "U6", "subway", "U Alt-Tegel", 8),
            departure_json(base, "U6", "subway", "U Alt-Mariendorf", 12),
        ]
    })
    .to_string()
}

fn journeys_json(
    base: DateTime<Utc>,
    change_at: &str,
    line: &str,
    product: &str,
    direction: &str,
) -> String {
    serde_json::json!({
        "journeys": [{
            "legs": [
                {
                    "origin": { "id": HOME, "name": "U Afrikanische Str. (Berlin)" },
                    "destination": { "name": change_at },
                    "departure": at(base, 5),
                    "plannedDeparture": at(base, 5),
                    "arrival": at(base, 9),
                    "plannedArrival": at(base, 9),
                    "direction": "U Alt-Mariendorf",
                    "line": { "name": "U6", "product": "subway" }
                },
                {
                    "origin": { "name": change_at },
                    "destination": { "name": "Somewhere" },
                    "departure": at(base, 13),
                    "plannedDeparture": at(base, 13),
                    "arrival": at(base, 25),
                    "plannedArrival": at(base, 25),
                    "direction": direction,
                    "line": { "name": line, "product": product }
                }
            ]
        }]
    })
    .to_string()
}

async fn mount_board(server: &MockServer, base: DateTime<Utc>, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/stops/{HOME}/departures")))
        .and(query_param("language", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_json(base)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn journeys_mock(to: &str, body: String) -> Mock {
    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("from", HOME))
        .and(query_param("to", to))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
}

async fn mount_journeys(server: &MockServer, base: DateTime<Utc>) {
    journeys_mock(
        HANSAPLATZ,
        journeys_json(base, "U Leopoldplatz (Berlin)", "U9", "subway", "S+U Rathaus Steglitz"),
    )
    .mount(server)
    .await;
    journeys_mock(
        WESTEND,
        journeys_json(base, "S+U Wedding (Berlin)", "S42", "suburban", "S42 Ring"),
    )
    .mount(server)
    .await;
    journeys_mock(
        BEKASSINENWEG,
        journeys_json(base, "U Alt-Tegel (Berlin)", "125", "bus", "S+U Osloer Str."),
    )
    .mount(server)
    .await;
}

// Client

#[tokio::test]
async fn test_get_departures_wrapped() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 1).await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let departures = client
        .get_departures(HOME, StdDuration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(departures.len(), 5);
    assert_eq!(departures[0].line_name, "U6");
    assert_eq!(departures[0].mode, Mode::Subway);
    assert_eq!(departures[0].direction, "U Alt-Mariendorf");
    assert_eq!(departures[0].when, t0() + Duration::minutes(2));
    assert_eq!(departures[2].mode, Mode::Bus);
}

#[tokio::test]
async fn test_get_departures_bare_array() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        departure_json(t0(), "U6", "subway", "U Alt-Tegel", 3),
        { "tripId": "cancelled", "when": null, "cancelled": true,
          "direction": "U Alt-Tegel", "line": { "name": "U6", "product": "subway" } }
    ]);

    Mock::given(method("GET"))
        .and(path(format!("/stops/{HOME}/departures")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let departures = client
        .get_departures(HOME, StdDuration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(departures.len(), 1);
}

#[tokio::test]
async fn test_get_journeys_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("from", HOME))
        .and(query_param("to", WESTEND))
        .and(query_param("results", "2"))
        .and(query_param("transfers", "1"))
        .and(query_param("startWithWalking", "false"))
        .and(query_param("regional", "false"))
        .and(query_param("tram", "false"))
        .and(query_param("bus", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(journeys_json(
            t0(),
            "S+U Wedding (Berlin)",
            "S42",
            "suburban",
            "S42 Ring",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let query = TransferTarget::stop("Westend", WESTEND, Products::suburban()).query(HOME);
    let response = client
        .get_journeys(&query, StdDuration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(response.journeys.len(), 1);
    assert_eq!(response.journeys[0].legs.len(), 2);
}

#[tokio::test]
async fn test_get_journeys_to_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("to.address", "Anklamer Str. 60"))
        .and(query_param("to.latitude", "52.533902"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"journeys": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let query = JourneyQuery {
        from: HOME.to_string(),
        to: Destination::Address {
            latitude: 52.533902,
            longitude: 13.393388,
            address: "Anklamer Str. 60".to_string(),
        },
        transfers: 1,
        products: Products::tram(),
    };
    let response = client
        .get_journeys(&query, StdDuration::from_secs(5))
        .await
        .unwrap();

    assert!(response.journeys.is_empty());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let result = client.get_departures(HOME, StdDuration::from_secs(5)).await;

    assert!(matches!(result, Err(TransitError::RateLimited)));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let result = client.get_departures(HOME, StdDuration::from_secs(5)).await;

    match result {
        Err(TransitError::ApiError { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream down");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let result = client.get_departures(HOME, StdDuration::from_secs(5)).await;

    match result {
        Err(TransitError::Json { body, .. }) => {
            assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
        }
        other => panic!("expected Json error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(board_json(t0()))
                .set_delay(StdDuration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = HafasClient::new(&HafasConfig::new(server.uri())).unwrap();
    let result = client
        .get_departures(HOME, StdDuration::from_millis(200))
        .await;

    assert!(matches!(
        result,
        Err(TransitError::Timeout { timeout_ms: 200 })
    ));
}

// Refresh cycle

#[tokio::test]
async fn test_full_cycle() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 1).await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    let snapshot = cache.ensure_fresh_at(t0()).await;

    assert_eq!(snapshot.refreshed_at, t0());
    assert_eq!(snapshot.departures.len(), 5);
    // Two subway directions, so the bus is not merged in
    assert_eq!(snapshot.groups.len(), 2);
    assert_eq!(snapshot.groups["Tegel"].departures, vec!["3m", "8m"]);

    assert_eq!(snapshot.inbound.len(), 2);
    assert_eq!(snapshot.inbound[0].line, "U9");
    assert_eq!(snapshot.inbound[0].destination, "Steglitz");
    assert_eq!(snapshot.inbound[0].change_station, "Leopoldplatz (Berlin)");
    assert_eq!(snapshot.inbound[0].stopover.to_string(), "4m");
    assert_eq!(snapshot.inbound[1].destination, RING_DESTINATION);
    assert_eq!(snapshot.outbound.len(), 1);
    assert_eq!(snapshot.outbound[0].mode, Mode::Bus);

    let display = snapshot.display(cache.config());
    assert!(!display.night);
    assert_eq!(display.routes.len(), 2);
    assert_eq!(display.routes[0].destination, "Mariendorf");
    assert_eq!(display.routes[0].departures, vec!["2m", "12m"]);
    assert_eq!(display.routes[0].connections.len(), 2);
    assert_eq!(display.routes[1].destination, "Tegel");
    assert_eq!(display.routes[1].connections[0].line, "125");
}

#[tokio::test]
async fn test_ensure_fresh_twice_fetches_once() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 1).await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    let first = cache.ensure_fresh_at(t0()).await;
    let second = cache.ensure_fresh_at(t0() + Duration::seconds(30)).await;

    assert!(Arc::ptr_eq(&first, &second));
    // MockServer verifies the single board request on drop
}

#[tokio::test]
async fn test_concurrent_callers_share_one_cycle() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 1).await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    let (a, b) = tokio::join!(cache.ensure_fresh_at(t0()), cache.ensure_fresh_at(t0()));

    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_refreshes_after_interval() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 2).await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    cache.ensure_fresh_at(t0()).await;
    let snapshot = cache.ensure_fresh_at(t0() + Duration::seconds(50)).await;

    assert_eq!(snapshot.refreshed_at, t0() + Duration::seconds(50));
}

#[tokio::test]
async fn test_empty_board_is_refetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/stops/{HOME}/departures")))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"departures": []}"#))
        .expect(2)
        .mount(&server)
        .await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    cache.ensure_fresh_at(t0()).await;
    let snapshot = cache.ensure_fresh_at(t0() + Duration::seconds(10)).await;

    assert!(snapshot.departures.is_empty());
    let display = snapshot.display(cache.config());
    assert!(display.night);
    assert!(display.routes.is_empty());
}

#[tokio::test]
async fn test_journey_timeout_drops_only_that_slot() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 1).await;

    journeys_mock(
        HANSAPLATZ,
        journeys_json(t0(), "U Leopoldplatz (Berlin)", "U9", "subway", "S+U Rathaus Steglitz"),
    )
    .mount(&server)
    .await;
    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("to", WESTEND))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(journeys_json(
                    t0(),
                    "S+U Wedding (Berlin)",
                    "S42",
                    "suburban",
                    "S42 Ring",
                ))
                .set_delay(StdDuration::from_secs(3)),
        )
        .mount(&server)
        .await;
    journeys_mock(
        BEKASSINENWEG,
        journeys_json(t0(), "U Alt-Tegel (Berlin)", "125", "bus", "S+U Osloer Str."),
    )
    .mount(&server)
    .await;

    let config = config_for_mock(&server.uri()).with_timeouts(5000, 300);
    let cache = cache_for(config);
    let snapshot = cache.ensure_fresh_at(t0()).await;

    assert_eq!(snapshot.departures.len(), 5);
    assert_eq!(snapshot.inbound.len(), 1);
    assert_eq!(snapshot.inbound[0].line, "U9");
    assert_eq!(snapshot.outbound.len(), 1);
}

#[tokio::test]
async fn test_failed_slot_reuses_retained_response() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 2).await;

    journeys_mock(
        HANSAPLATZ,
        journeys_json(t0(), "U Leopoldplatz (Berlin)", "U9", "subway", "S+U Rathaus Steglitz"),
    )
    .up_to_n_times(1)
    .with_priority(1)
    .mount(&server)
    .await;
    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("to", HANSAPLATZ))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    journeys_mock(
        WESTEND,
        journeys_json(t0(), "S+U Wedding (Berlin)", "S42", "suburban", "S42 Ring"),
    )
    .mount(&server)
    .await;
    journeys_mock(
        BEKASSINENWEG,
        journeys_json(t0(), "U Alt-Tegel (Berlin)", "125", "bus", "S+U Osloer Str."),
    )
    .mount(&server)
    .await;

    let cache = cache_for(config_for_mock(&server.uri()));
    let first = cache.ensure_fresh_at(t0()).await;
    assert_eq!(first.inbound.len(), 2);

    let second = cache.ensure_fresh_at(t0() + Duration::seconds(60)).await;
    assert_eq!(second.inbound.len(), 2);
    assert_eq!(second.inbound[0].line, "U9");
}

#[tokio::test]
async fn test_failed_slot_without_retention_is_absent() {
    let server = MockServer::start().await;
    mount_board(&server, t0(), 2).await;

    journeys_mock(
        HANSAPLATZ,
        journeys_json(t0(), "U Leopoldplatz (Berlin)", "U9", "subway", "S+U Rathaus Steglitz"),
    )
    .up_to_n_times(1)
    .with_priority(1)
    .mount(&server)
    .await;
    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("to", HANSAPLATZ))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    journeys_mock(
        WESTEND,
        journeys_json(t0(), "S+U Wedding (Berlin)", "S42", "suburban", "S42 Ring"),
    )
    .mount(&server)
    .await;
    journeys_mock(
        BEKASSINENWEG,
        journeys_json(t0(), "U Alt-Tegel (Berlin)", "125", "bus", "S+U Osloer Str."),
    )
    .mount(&server)
    .await;

    let cache = cache_for(config_for_mock(&server.uri()).with_retention(0));
    cache.ensure_fresh_at(t0()).await;
    let second = cache.ensure_fresh_at(t0() + Duration::seconds(60)).await;

    // Order is kept: the remaining connection is the second slot's
    assert_eq!(second.inbound.len(), 1);
    assert_eq!(second.inbound[0].destination, RING_DESTINATION);
}

#[tokio::test]
async fn test_failed_board_keeps_previous_board() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/stops/{HOME}/departures")))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_json(t0())))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/stops/{HOME}/departures")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_journeys(&server, t0()).await;

    let cache = cache_for(config_for_mock(&server.uri()));
    cache.ensure_fresh_at(t0()).await;

    let later = t0() + Duration::seconds(90);
    let snapshot = cache.ensure_fresh_at(later).await;

    assert_eq!(snapshot.refreshed_at, later);
    assert_eq!(snapshot.departures.len(), 5);
    // Labels count down against the new time
    assert_eq!(snapshot.groups["Mariendorf"].departures, vec!["now", "10m"]);
    assert_eq!(snapshot.groups["Tegel"].departures, vec!["1m", "6m"]);
}

// HTTP surface

#[tokio::test]
async fn test_http_endpoints() {
    let server = MockServer::start().await;
    let base = Utc::now();
    mount_board(&server, base, 1).await;
    mount_journeys(&server, base).await;

    let cache = Arc::new(cache_for(config_for_mock(&server.uri())));
    let app = create_router(AppState::new(cache));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let http = reqwest::Client::new();

    let health = http
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "ok");

    let status: serde_json::Value = http
        .get(format!("http://{addr}/board/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(status["refreshed_at"].is_null());
    assert_eq!(status["departures"], 0);

    let board: serde_json::Value = http
        .get(format!("http://{addr}/board"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(board["night"], false);
    let routes = board["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0]["destination"], "Mariendorf");
    assert_eq!(routes[0]["mode"], "subway");
    assert_eq!(routes[0]["departures"].as_array().unwrap().len(), 2);
    assert_eq!(routes[0]["connections"][0]["line"], "U9");
    assert_eq!(routes[0]["connections"][0]["stopover"], "4m");
    assert_eq!(routes[0]["connections"][1]["destination"], "Ring");

    let status: serde_json::Value = http
        .get(format!("http://{addr}/board/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(status["refreshed_at"].is_string());
    assert_eq!(status["departures"], 5);
    assert_eq!(status["directions"], 2);
    assert_eq!(status["inbound_connections"], 2);
    assert_eq!(status["outbound_connections"], 1);
}
