use crate::{
    ReportConfig,
    error::ReportError,
    model::ForecastPeriod,
    provider::{waqi::WaqiProvider, weather_gov::WeatherGovProvider, wttr_in::WttrInProvider},
};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use std::fmt::Debug;

pub mod waqi;
pub mod weather_gov;
pub mod wttr_in;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Current forecast period for a gridpoint.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn current_period(&self, grid: &str) -> Result<ForecastPeriod, ReportError>;
}

/// Free-form conditions snippet (humidity, precipitation) appended verbatim.
#[async_trait]
pub trait ConditionsSource: Send + Sync + Debug {
    async fn conditions(&self, location: &str, format: &str) -> Result<String, ReportError>;
}

#[async_trait]
pub trait AirQualitySource: Send + Sync + Debug {
    async fn aqi(&self, station: &str) -> Result<i64, ReportError>;
}

/// The three collaborators a report is built from.
#[derive(Debug)]
pub struct Providers {
    pub forecast: Box<dyn ForecastSource>,
    pub conditions: Box<dyn ConditionsSource>,
    pub air_quality: Box<dyn AirQualitySource>,
}

impl Providers {
    /// HTTP-backed providers sharing one client, pointed at the configured endpoints.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        let http = http_client()?;
        let endpoints = &config.endpoints;

        Ok(Self {
            forecast: Box::new(WeatherGovProvider::new(&endpoints.weather_gov, http.clone())),
            conditions: Box::new(WttrInProvider::new(&endpoints.wttr_in, http.clone())),
            air_quality: Box::new(WaqiProvider::new(&endpoints.waqi, http)),
        })
    }
}

/// api.weather.gov refuses requests without a User-Agent.
pub fn http_client() -> Result<Client, ReportError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| ReportError::Fetch(format!("Failed to build HTTP client: {err}")))
}

/// GET `url` and return the body of a successful response.
pub(crate) async fn get_text(
    http: &Client,
    url: &str,
    accept: Option<&str>,
) -> Result<String, ReportError> {
    let mut req = http.get(url);
    if let Some(accept) = accept {
        req = req.header(header::ACCEPT, accept);
    }

    let res = req.send().await.map_err(|err| transport_error(err, url))?;
    let status = res.status();
    if !status.is_success() {
        return Err(ReportError::Fetch(format!(
            "{status} for url: {}",
            redact_query(url)
        )));
    }

    res.text().await.map_err(|err| transport_error(err, url))
}

fn transport_error(err: reqwest::Error, url: &str) -> ReportError {
    ReportError::Fetch(format!("{} for url: {}", err.without_url(), redact_query(url)))
}

pub(crate) async fn get_json(
    http: &Client,
    url: &str,
    accept: Option<&str>,
) -> Result<Value, ReportError> {
    let body = get_text(http, url, accept).await?;

    serde_json::from_str(&body).map_err(|err| {
        ReportError::Fetch(format!("Invalid JSON from {}: {err}", redact_query(url)))
    })
}

/// Query strings may carry API tokens.
fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// ── JSON walking ──────────────────────────────────────────────────────
//
// Fields are looked up one step at a time so errors name the exact key or index.

pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, ReportError> {
    value
        .get(key)
        .ok_or_else(|| ReportError::MissingKey(key.to_string()))
}

pub(crate) fn element<'a>(
    value: &'a Value,
    key: &str,
    index: usize,
) -> Result<&'a Value, ReportError> {
    let items = value.as_array().ok_or_else(|| ReportError::InvalidValue {
        key: key.to_string(),
        expected: "a list",
    })?;

    items.get(index).ok_or(ReportError::PeriodIndex(index))
}

pub(crate) fn as_integer(value: &Value, key: &str) -> Result<i64, ReportError> {
    value.as_i64().ok_or_else(|| ReportError::InvalidValue {
        key: key.to_string(),
        expected: "an integer",
    })
}

pub(crate) fn as_string(value: &Value, key: &str) -> Result<String, ReportError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ReportError::InvalidValue {
            key: key.to_string(),
            expected: "a string",
        })
}
