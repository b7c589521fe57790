use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{error::ReportError, model::ForecastPeriod};

use super::{ForecastSource, as_integer, as_string, element, field, get_json, join_url};

/// Gridpoint forecasts from api.weather.gov.
#[derive(Debug, Clone)]
pub struct WeatherGovProvider {
    base_url: String,
    http: Client,
}

impl WeatherGovProvider {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http,
        }
    }

    fn forecast_url(&self, grid: &str) -> String {
        join_url(&self.base_url, &format!("gridpoints/{grid}/forecast"))
    }
}

/// `properties.periods[0]` of a forecast document.
pub fn parse_first_period(doc: &Value) -> Result<ForecastPeriod, ReportError> {
    let periods = field(field(doc, "properties")?, "periods")?;
    let period = element(periods, "periods", 0)?;

    let name = match period.get("name") {
        Some(name) => Some(as_string(name, "name")?),
        None => None,
    };

    Ok(ForecastPeriod {
        name,
        temperature_f: as_integer(field(period, "temperature")?, "temperature")?,
        short_forecast: as_string(field(period, "shortForecast")?, "shortForecast")?,
    })
}

#[async_trait]
impl ForecastSource for WeatherGovProvider {
    async fn current_period(&self, grid: &str) -> Result<ForecastPeriod, ReportError> {
        let url = self.forecast_url(grid);
        debug!(%url, "fetching forecast");

        let doc = get_json(&self.http, &url, Some("application/geo+json")).await?;
        let period = parse_first_period(&doc)?;

        debug!(?period, "current forecast period");
        Ok(period)
    }
}
