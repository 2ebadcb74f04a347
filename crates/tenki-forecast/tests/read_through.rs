//! Integration tests for ForecastService using wiremock.
//!
//! These tests verify the read-through pipeline against a mock JMA endpoint.

use std::time::Duration;

use tempfile::TempDir;
use tenki_forecast::{ForecastError, ForecastService, WEEKLY_DAYS};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to build a JMA-shaped document: a short edition followed by the
/// weekly one with the given number of sub-areas.
fn forecast_document(sub_areas: usize) -> serde_json::Value {
    let days: Vec<String> = (0..WEEKLY_DAYS)
        .map(|d| format!("2026-08-{:02}T00:00:00+09:00", 23 + d))
        .collect();
    let short_days: Vec<String> = days.iter().take(3).cloned().collect();

    let weather_areas: Vec<serde_json::Value> = (0..sub_areas)
        .map(|i| {
            serde_json::json!({
                "area": { "name": format!("地方{}", i), "code": format!("13001{}", i) },
                "weatherCodes": vec!["201"; WEEKLY_DAYS],
            })
        })
        .collect();
    let temp_areas: Vec<serde_json::Value> = (0..sub_areas)
        .map(|i| {
            let mut mins = vec!["19".to_string(); WEEKLY_DAYS];
            mins[0] = String::new();
            serde_json::json!({
                "area": { "name": format!("観測点{}", i), "code": format!("4413{}", i) },
                "tempsMin": mins,
                "tempsMax": vec!["31"; WEEKLY_DAYS],
            })
        })
        .collect();

    serde_json::json!([
        {
            "publishingOffice": "気象庁",
            "reportDatetime": "2026-08-23T11:00:00+09:00",
            "timeSeries": [
                { "timeDefines": short_days, "areas": weather_areas.clone() },
            ],
        },
        {
            "publishingOffice": "気象庁",
            "reportDatetime": "2026-08-23T11:00:00+09:00",
            "timeSeries": [
                { "timeDefines": days, "areas": weather_areas },
                { "timeDefines": days, "areas": temp_areas },
            ],
        },
    ])
}

fn service_for(mock_server: &MockServer, dir: &TempDir) -> ForecastService {
    ForecastService::with_base_url(
        dir.path().join("cache.db"),
        &mock_server.uri(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_second_read_hits_cache_without_network() {
    let mock_server = MockServer::start().await;

    // expect(1): a second HTTP request fails the test
    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_document(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let first = service.get("130000").await.unwrap();
    let second = service.get("130000").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_row_count_is_subareas_times_seven() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_document(3)))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let rows = service.get("130000").await.unwrap();
    assert_eq!(rows.len(), 3 * WEEKLY_DAYS);

    // Grouped by sub-area, then chronological
    assert_eq!(rows[0].area_name_primary, "地方0");
    assert_eq!(rows[WEEKLY_DAYS].area_name_primary, "地方1");
    assert!(rows[0].date < rows[1].date);
}

#[tokio::test]
async fn test_missing_temps_are_absent_not_zero() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_document(1)))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let rows = service.get("130000").await.unwrap();
    assert_eq!(rows[0].min_temp, None);
    assert_eq!(rows[1].min_temp, Some(19.0));
    assert_eq!(rows[0].max_temp, Some(31.0));
}

#[tokio::test]
async fn test_malformed_response_errors_and_leaves_store_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let err = service.get("130000").await.unwrap_err();
    assert!(matches!(err, ForecastError::Malformed(_)));

    // Nothing was stored, so the next read goes back to the network
    let err = service.get("130000").await.unwrap_err();
    assert!(matches!(err, ForecastError::Malformed(_)));
}

#[tokio::test]
async fn test_missing_weekly_edition_is_an_error_and_retries() {
    let mock_server = MockServer::start().await;

    // Only a 3-day edition published
    let days: Vec<String> =
        (0..3).map(|d| format!("2026-08-{:02}T00:00:00+09:00", 23 + d)).collect();
    let doc = serde_json::json!([
        {
            "timeSeries": [
                {
                    "timeDefines": days,
                    "areas": [
                        { "area": { "name": "東京地方", "code": "130010" }, "weatherCodes": ["100", "101", "200"] }
                    ],
                },
            ],
        },
    ]);

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let err = service.get("130000").await.unwrap_err();
    assert!(matches!(err, ForecastError::NoWeeklyEdition(code) if code == "130000"));

    let err = service.get("130000").await.unwrap_err();
    assert!(matches!(err, ForecastError::NoWeeklyEdition(_)));
}

#[tokio::test]
async fn test_unknown_area_surfaces_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/999999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    let err = service.get("999999").await.unwrap_err();
    assert!(matches!(err, ForecastError::AreaNotFound(code) if code == "999999"));
}

#[tokio::test]
async fn test_distinct_areas_fetch_independently() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/130000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_document(2)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast/data/forecast/270000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_document(1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let service = service_for(&mock_server, &dir);

    assert_eq!(service.get("130000").await.unwrap().len(), 2 * WEEKLY_DAYS);
    assert_eq!(service.get("270000").await.unwrap().len(), WEEKLY_DAYS);
    // Both still served from cache afterwards
    assert_eq!(service.get("130000").await.unwrap().len(), 2 * WEEKLY_DAYS);
}

#[tokio::test]
async fn test_area_directory_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/common/const/area.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "centers": {
                "010300": { "name": "関東甲信地方", "enName": "Kanto Koshin", "children": ["130000", "140000"] }
            },
            "offices": {
                "130000": { "name": "東京都", "enName": "Tokyo", "parent": "010300" },
                "140000": { "name": "神奈川県", "enName": "Kanagawa", "parent": "010300" }
            }
        })))
        .mount(&mock_server)
        .await;

    let client = tenki_forecast::JmaClient::with_base_url(
        &mock_server.uri(),
        Duration::from_secs(5),
    )
    .unwrap();

    let directory = client.fetch_area_directory().await.unwrap();
    assert_eq!(directory.offices["130000"].name, "東京都");
    assert_eq!(directory.centers["010300"].children, vec!["130000", "140000"]);
}
