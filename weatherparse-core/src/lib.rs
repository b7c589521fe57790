//! Core library for the `weatherparse` CLI.
//!
//! This crate defines:
//! - Configuration (command line, TOML file, defaults)
//! - The report cache on disk
//! - Providers for api.weather.gov, wttr.in and api.waqi.info
//! - The [`WeatherReporter`] pipeline that ties them together
//!
//! It is used by `weatherparse-cli`, but can also be driven with custom providers.

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;

pub use cache::{CachedReport, ReportCache};
pub use config::{ConfigOverrides, Endpoints, FileConfig, FormatOptions, ReportConfig};
pub use error::ReportError;
pub use model::{AqiLevel, ForecastPeriod, celsius, classify_aqi};
pub use provider::{AirQualitySource, ConditionsSource, ForecastSource, Providers};
pub use report::{WeatherReporter, format_report};
