use tracing::{debug, warn};

use crate::{
    cache::ReportCache,
    config::{FormatOptions, ReportConfig},
    error::ReportError,
    model::{ForecastPeriod, classify_aqi},
    provider::Providers,
};

/// Builds the one-line report, serving it from the cache while fresh.
#[derive(Debug)]
pub struct WeatherReporter {
    config: ReportConfig,
    cache: ReportCache,
    providers: Providers,
}

impl WeatherReporter {
    pub fn new(config: ReportConfig, providers: Providers) -> Self {
        let cache = ReportCache::new(&config.cache_path, config.cache_timeout);
        Self {
            config,
            cache,
            providers,
        }
    }

    /// Reporter backed by the real HTTP services.
    pub fn from_config(config: ReportConfig) -> Result<Self, ReportError> {
        let providers = Providers::from_config(&config)?;
        Ok(Self::new(config, providers))
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Cached report if fresh, otherwise fetch, compose and cache a new one.
    ///
    /// A failure in any configured service fails the whole report and leaves the
    /// cache untouched. A failed cache write is logged and the report still returned.
    pub async fn get_report(&self) -> Result<String, ReportError> {
        let query = self.config.query_fingerprint();

        if let Some(report) = self.cache.load(&query) {
            return Ok(report);
        }

        let report = self.fetch_report().await?;

        match self.cache.store(&query, &report) {
            Ok(()) => debug!(path = %self.cache.path().display(), "report cached"),
            Err(err) => warn!(error = %err, "report not cached"),
        }

        Ok(report)
    }

    async fn fetch_report(&self) -> Result<String, ReportError> {
        let options = &self.config.format;

        let period = self
            .providers
            .forecast
            .current_period(&self.config.weather_gov)
            .await?;

        if options.period_name && period.name.is_none() {
            return Err(ReportError::MissingKey("name".to_string()));
        }

        let conditions = match &self.config.wttr_in {
            Some(location) => Some(
                self.providers
                    .conditions
                    .conditions(location, &options.wttr_format)
                    .await?,
            ),
            None => None,
        };

        let aqi = match &self.config.waqi {
            Some(station) => Some(self.providers.air_quality.aqi(station).await?),
            None => None,
        };

        Ok(format_report(&period, conditions.as_deref(), aqi, options))
    }
}

/// `[{name} ]{F}°F/{C}°C {shortForecast}{conditions}[, AQI {aqi}[ ({label})]]`
pub fn format_report(
    period: &ForecastPeriod,
    conditions: Option<&str>,
    aqi: Option<i64>,
    options: &FormatOptions,
) -> String {
    let mut out = String::new();

    if let Some(name) = period.name.as_deref().filter(|_| options.period_name) {
        out.push_str(name);
        out.push(' ');
    }

    out.push_str(&format!(
        "{}°F/{}°C {}",
        period.temperature_f,
        period.temperature_c(),
        period.short_forecast
    ));

    if let Some(conditions) = conditions {
        out.push_str(conditions);
    }

    if let Some(aqi) = aqi {
        out.push_str(&format!(", AQI {aqi}"));
        if options.aqi_label {
            out.push_str(&format!(" ({})", classify_aqi(aqi)));
        }
    }

    out
}
