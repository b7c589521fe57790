use thiserror::Error;

/// Everything that can stop a report from being produced.
///
/// The `Display` output is the exact line printed to the user.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Transport failure, non-success status, or an undecodable body.
    #[error("Error fetching weather data: {0}")]
    Fetch(String),

    #[error("Error parsing JSON data: Missing key '{0}'")]
    MissingKey(String),

    #[error("Error accessing forecast period: list index {0} out of range")]
    PeriodIndex(usize),

    #[error("Error parsing JSON data: key '{key}' is not {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("Error accessing cache: {0}")]
    Cache(String),

    #[error("Error loading configuration: {0}")]
    Config(String),
}

impl ReportError {
    /// Flatten an `anyhow` chain into a single `Config` message.
    pub fn config(err: anyhow::Error) -> Self {
        ReportError::Config(format!("{err:#}"))
    }
}
