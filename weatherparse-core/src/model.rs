use serde::{Deserialize, Serialize};
use std::fmt;

/// The first period of a gridpoint forecast, as much of it as a report needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    /// `None` when the response omits it; only required when the report shows it.
    pub name: Option<String>,
    pub temperature_f: i64,
    pub short_forecast: String,
}

impl ForecastPeriod {
    pub fn temperature_c(&self) -> i64 {
        celsius(self.temperature_f)
    }
}

/// Fahrenheit to Celsius, truncated toward zero.
pub fn celsius(fahrenheit: i64) -> i64 {
    (fahrenheit - 32) * 5 / 9
}

/// US EPA air quality bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    /// Each band includes its upper bound.
    pub fn classify(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitive,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitive => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_aqi(aqi: i64) -> AqiLevel {
    AqiLevel::classify(aqi)
}
