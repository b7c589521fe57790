use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::ReportError;

use super::{ConditionsSource, get_text, join_url};

/// Humidity and precipitation snippets from wttr.in, in USCS units.
#[derive(Debug, Clone)]
pub struct WttrInProvider {
    base_url: String,
    http: Client,
}

impl WttrInProvider {
    pub fn new(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.to_string(),
            http,
        }
    }

    fn conditions_url(&self, location: &str, format: &str) -> String {
        format!("{}?format={format}&u", join_url(&self.base_url, location))
    }
}

#[async_trait]
impl ConditionsSource for WttrInProvider {
    async fn conditions(&self, location: &str, format: &str) -> Result<String, ReportError> {
        let url = self.conditions_url(location, format);
        debug!(%url, "fetching conditions");

        get_text(&self.http, &url, None).await
    }
}
