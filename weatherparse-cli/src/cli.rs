use clap::Parser;
use std::path::PathBuf;
use weatherparse_core::{ConfigOverrides, FileConfig, ReportConfig, ReportError, WeatherReporter};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherparse", version, about = "Prints weather data.")]
pub struct Cli {
    /// Cache file for the last report (default: $HOME/.cache/weatherparse-cache.json).
    #[arg(short, long)]
    pub cache: Option<PathBuf>,

    /// Length of time the cache is good for, in seconds (default: 3600).
    #[arg(long = "cache_timeout", visible_alias = "cache-timeout", value_name = "SECONDS")]
    pub cache_timeout: Option<u64>,

    /// URL segment for api.weather.gov (default: 'MKX/37,61').
    #[arg(long = "weather_gov", visible_alias = "weather-gov", value_name = "GRID")]
    pub weather_gov: Option<String>,

    /// Location for wttr.in humidity and precipitation, e.g. '53711'.
    #[arg(long = "wttr_in", visible_alias = "wttr-in", value_name = "LOCATION")]
    pub wttr_in: Option<String>,

    /// URL segment for api.waqi.info (looks like '@5933/?token=aabbccdd').
    #[arg(long, value_name = "STATION")]
    pub waqi: Option<String>,

    /// Config file (default: platform config dir, weatherparse/config.toml).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Prefix the report with the forecast period name, e.g. "Tonight".
    #[arg(long)]
    pub period_name: bool,

    /// Append the AQI severity label, e.g. "(Moderate)".
    #[arg(long)]
    pub aqi_label: bool,

    /// wttr.in format string (default: ', %h, %p').
    #[arg(long, value_name = "FORMAT")]
    pub wttr_format: Option<String>,
}

impl Cli {
    /// Print the report, or the error in its place. Failures do not change the exit code.
    pub async fn run(self) -> anyhow::Result<()> {
        let line = match self.report().await {
            Ok(report) => report,
            Err(err) => {
                tracing::debug!(?err, "report failed");
                err.to_string()
            }
        };

        println!("{line}");
        Ok(())
    }

    async fn report(self) -> Result<String, ReportError> {
        let file = FileConfig::load(self.config.as_deref()).map_err(ReportError::config)?;
        let config = ReportConfig::resolve(file, self.overrides()).map_err(ReportError::config)?;

        WeatherReporter::from_config(config)?.get_report().await
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cache: self.cache.clone(),
            cache_timeout: self.cache_timeout,
            weather_gov: self.weather_gov.clone(),
            wttr_in: self.wttr_in.clone(),
            waqi: self.waqi.clone(),
            // an absent flag leaves the config file in charge
            period_name: self.period_name.then_some(true),
            aqi_label: self.aqi_label.then_some(true),
            wttr_format: self.wttr_format.clone(),
        }
    }
}
