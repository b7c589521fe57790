//! End-to-end tests for WeatherReporter against mock HTTP servers.

use std::{fs, path::Path};

use chrono::{Duration, Utc};
use weatherparse_core::{CachedReport, Endpoints, ReportCache, ReportConfig, WeatherReporter};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORECAST_PATH: &str = "/gridpoints/MKX/37,61/forecast";

fn tonight_forecast() -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "periods": [
                { "name": "Tonight", "temperature": 41, "shortForecast": "Clear" }
            ]
        }
    })
}

fn config_for(server: &MockServer, dir: &Path) -> ReportConfig {
    let mut config = ReportConfig::new(dir.join("weatherparse-cache.json"));
    config.endpoints = Endpoints {
        weather_gov: server.uri(),
        wttr_in: server.uri(),
        waqi: server.uri(),
    };
    config
}

fn read_record(path: &Path) -> CachedReport {
    let raw = fs::read_to_string(path).expect("cache file should exist");
    serde_json::from_str(&raw).expect("cache file should hold a record")
}

async fn mount_forecast(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(tonight_forecast()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_base_report_is_fetched_and_cached() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(header("accept", "application/geo+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tonight_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, dir.path());
    let cache_path = config.cache_path.clone();
    let query = config.query_fingerprint();
    let reporter = WeatherReporter::from_config(config).unwrap();

    let report = reporter.get_report().await.unwrap();

    assert_eq!(report, "41°F/5°C Clear");
    let record = read_record(&cache_path);
    assert_eq!(record.report, "41°F/5°C Clear");
    assert_eq!(record.query, query);
}

#[tokio::test]
async fn test_fresh_cache_makes_no_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_forecast(&server, 0).await;

    let config = config_for(&server, dir.path());
    ReportCache::new(&config.cache_path, config.cache_timeout)
        .store(&config.query_fingerprint(), "Earlier 50°F/10°C Cloudy")
        .unwrap();

    let reporter = WeatherReporter::from_config(config).unwrap();
    let report = reporter.get_report().await.unwrap();

    assert_eq!(report, "Earlier 50°F/10°C Cloudy");
}

#[tokio::test]
async fn test_expired_cache_is_refetched_and_overwritten() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_forecast(&server, 1).await;

    let config = config_for(&server, dir.path());
    let cache_path = config.cache_path.clone();
    ReportCache::new(&config.cache_path, config.cache_timeout)
        .store_at(
            &config.query_fingerprint(),
            "stale",
            Utc::now() - Duration::seconds(3601),
        )
        .unwrap();

    let reporter = WeatherReporter::from_config(config).unwrap();
    let report = reporter.get_report().await.unwrap();

    assert_eq!(report, "41°F/5°C Clear");
    assert_eq!(read_record(&cache_path).report, "41°F/5°C Clear");
}

#[tokio::test]
async fn test_changed_location_ignores_cached_report() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_forecast(&server, 1).await;

    let config = config_for(&server, dir.path());
    ReportCache::new(&config.cache_path, config.cache_timeout)
        .store("LOT/70,73|||false|false|, %h, %p", "Chicago 30°F/-1°C Snow")
        .unwrap();

    let report = WeatherReporter::from_config(config)
        .unwrap()
        .get_report()
        .await
        .unwrap();

    assert_eq!(report, "41°F/5°C Clear");
}

#[tokio::test]
async fn test_missing_periods_is_parse_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "properties": {} })),
        )
        .mount(&server)
        .await;

    let config = config_for(&server, dir.path());
    let cache_path = config.cache_path.clone();
    let result = WeatherReporter::from_config(config).unwrap().get_report().await;

    let err = result.unwrap_err().to_string();
    assert_eq!(err, "Error parsing JSON data: Missing key 'periods'");
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn test_server_error_is_fetch_error_and_not_cached() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let config = config_for(&server, dir.path());
    let cache_path = config.cache_path.clone();
    let result = WeatherReporter::from_config(config).unwrap().get_report().await;

    let err = result.unwrap_err().to_string();
    assert!(err.starts_with("Error fetching weather data: "), "{err}");
    assert!(err.contains("500"), "Error should mention status: {err}");
    assert!(!cache_path.exists());
}

#[tokio::test]
async fn test_invalid_json_is_fetch_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let config = config_for(&server, dir.path());
    let result = WeatherReporter::from_config(config).unwrap().get_report().await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("Invalid JSON"), "{err}");
}

#[tokio::test]
async fn test_full_report_with_conditions_and_aqi() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_forecast(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/53711"))
        .respond_with(ResponseTemplate::new(200).set_body_string(", 80%, 0.0in"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/feed/@5933/"))
        .and(query_param("token", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ok", "data": { "aqi": 57 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, dir.path());
    config.wttr_in = Some("53711".into());
    config.waqi = Some("@5933/?token=abc".into());
    config.format.period_name = true;
    config.format.aqi_label = true;

    let report = WeatherReporter::from_config(config)
        .unwrap()
        .get_report()
        .await
        .unwrap();

    assert_eq!(report, "Tonight 41°F/5°C Clear, 80%, 0.0in, AQI 57 (Moderate)");
}

#[tokio::test]
async fn test_air_quality_failure_aborts_report() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_forecast(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/feed/@5933/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut config = config_for(&server, dir.path());
    config.waqi = Some("@5933/?token=secret".into());
    let cache_path = config.cache_path.clone();

    let err = WeatherReporter::from_config(config)
        .unwrap()
        .get_report()
        .await
        .unwrap_err()
        .to_string();

    assert!(err.starts_with("Error fetching weather data: 403"), "{err}");
    assert!(!err.contains("secret"), "token must not leak: {err}");
    assert!(!cache_path.exists());
}
