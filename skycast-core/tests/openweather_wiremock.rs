//! HTTP-level tests for the OpenWeather adapter against a local mock server.

use chrono::{TimeZone, Utc};
use skycast_core::{
    FetchError, WeatherProvider, WeatherService, normalize_at,
    provider::openweather::OpenWeatherProvider,
};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "test-key";

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 26, "feels_like": 26.4, "pressure": 1012, "humidity": 55 },
        "visibility": 10000,
        "wind": { "speed": 10, "deg": 202, "gust": 14.2 },
        "clouds": { "all": 5 },
        "dt": 1717243200,
        "sys": { "country": "GB" },
        "timezone": 3600,
        "name": "London"
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "list": [
            { "dt": 1717243200, "main": { "temp": 22.0 }, "weather": [{ "id": 801, "description": "few clouds", "icon": "02d" }] },
            { "dt": 1717254000, "main": { "temp": 25.5 }, "weather": [{ "id": 800, "description": "clear sky", "icon": "01d" }] },
            { "dt": 1717264800, "main": { "temp": 18.1 }, "weather": [{ "id": 500, "description": "light rain", "icon": "10n" }], "rain": { "3h": 0.8 } }
        ],
        "city": { "name": "London", "country": "GB", "timezone": 3600 }
    })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new(API_KEY.to_string()).with_base_url(&server.uri())
}

async fn mount_bundle(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

// ============================================================================
// Current conditions
// ============================================================================

#[tokio::test]
async fn by_name_fetches_current_and_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London,GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "London,GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = provider_for(&server)
        .fetch_current_by_name("London", Some("GB"))
        .await
        .expect("lookup succeeds");

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let snapshot = normalize_at(&raw, now);

    assert_eq!(snapshot.location.name, "London");
    assert_eq!(snapshot.location.country, "GB");
    assert_eq!(snapshot.location.localtime, "2024-06-01T13:00:00.000Z");
    assert_eq!(snapshot.current.temp_c, 26);
    assert_eq!(snapshot.current.temp_f, 79);
    // 26.4 °C feels-like stores as 26 but converts to 79.52 °F
    assert_eq!(snapshot.current.feelslike_c, 26);
    assert_eq!(snapshot.current.feelslike_f, 80);
    assert_eq!(snapshot.current.wind_dir, "SSW");
    assert_eq!(snapshot.current.gust_kph, 14);
    assert_eq!(snapshot.current.uv, 8);

    assert_eq!(snapshot.forecast.len(), 1);
    assert_eq!(snapshot.forecast[0].maxtemp_c, 26);
    assert_eq!(snapshot.forecast[0].mintemp_c, 18);
    assert_eq!(snapshot.forecast[0].total_precip_mm, 0.8);
}

#[tokio::test]
async fn by_name_without_hint_sends_plain_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_name("Paris", None).await;
    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn by_coords_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_coords(51.5, -0.12).await;
    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn invalid_coordinates_never_reach_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_coords(-95.0, 10.0).await;
    assert!(
        matches!(result, Err(FetchError::InvalidCoordinates { .. })),
        "Expected InvalidCoordinates, got: {result:?}"
    );
}

#[tokio::test]
async fn partial_body_still_normalizes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "Atlantis" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let raw = provider_for(&server)
        .fetch_current_by_name("Atlantis", None)
        .await
        .expect("lookup succeeds");
    let snapshot = normalize_at(&raw, Utc::now());

    assert_eq!(snapshot.location.name, "Atlantis");
    assert_eq!(snapshot.current.vis_km, 10);
    assert_eq!(snapshot.current.condition.text, "Unknown");
    assert!(snapshot.forecast.is_empty());
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"cod\":401,\"message\":\"Invalid API key\"}"))
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_name("London", None).await;
    match result {
        Err(FetchError::Status { status, body, .. }) => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("Expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn forecast_failure_fails_the_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_name("London", None).await;
    assert!(matches!(result, Err(FetchError::Status { .. })), "got: {result:?}");
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = provider_for(&server).fetch_current_by_name("London", None).await;
    assert!(matches!(result, Err(FetchError::Decode { .. })), "got: {result:?}");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let provider = OpenWeatherProvider::new(API_KEY.to_string()).with_base_url("http://127.0.0.1:1");

    let result = provider.fetch_current_by_name("London", None).await;
    assert!(matches!(result, Err(FetchError::Transport { .. })), "got: {result:?}");
}

#[tokio::test]
async fn service_keeps_last_good_snapshot_after_failure() {
    let server = MockServer::start().await;
    mount_bundle(&server).await;

    let service = WeatherService::new(Arc::new(provider_for(&server)));
    let good = service.snapshot_for_place("London", None).await.expect("first lookup");

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(service.snapshot_for_place("London", None).await.is_err());
    let current = service.current().expect("snapshot kept");
    assert!(Arc::ptr_eq(&current, &good));
}

// ============================================================================
// Place search
// ============================================================================

#[tokio::test]
async fn search_returns_candidates_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Spring"))
        .and(query_param("limit", "10"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Springfield", "lat": 39.8, "lon": -89.6, "country": "US", "state": "Illinois",
              "local_names": { "en": "Springfield" } },
            { "name": "Springs", "lat": -26.25, "lon": 28.4, "country": "ZA" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = provider_for(&server).search_places("Spring").await;

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].label(), "Springfield, Illinois, US");
    assert_eq!(candidates[1].country, "ZA");
    assert_eq!(candidates[1].state, None);
}

#[tokio::test]
async fn search_failure_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert!(provider_for(&server).search_places("Spring").await.is_empty());
}

#[tokio::test]
async fn search_with_malformed_body_degrades_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cod": "400" })))
        .mount(&server)
        .await;

    assert!(provider_for(&server).search_places("Spring").await.is_empty());
}

#[tokio::test]
async fn blank_search_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert!(provider_for(&server).search_places("   ").await.is_empty());
}
