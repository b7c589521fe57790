use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::ReportError;

use super::{AirQualitySource, as_integer, field, get_json, join_url};

/// Station feeds from api.waqi.info.
///
/// The station segment includes the access token, e.g. `@5933/?token=...`.
#[derive(Debug, Clone)]
pub struct WaqiProvider {
    base_url: String,
    http: Client,
}

impl WaqiProvider {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http,
        }
    }
}

/// `data.aqi` of a feed document.
pub fn parse_aqi(doc: &Value) -> Result<i64, ReportError> {
    as_integer(field(field(doc, "data")?, "aqi")?, "aqi")
}

#[async_trait]
impl AirQualitySource for WaqiProvider {
    async fn aqi(&self, station: &str) -> Result<i64, ReportError> {
        let url = join_url(&self.base_url, &format!("feed/{station}"));
        debug!("fetching air quality");

        let doc = get_json(&self.http, &url, None).await?;
        parse_aqi(&doc)
    }
}
