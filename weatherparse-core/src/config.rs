use anyhow::{Context, Result, anyhow};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_WEATHER_GOV: &str = "MKX/37,61";
pub const DEFAULT_WTTR_FORMAT: &str = ", %h, %p";

/// Base URLs of the three services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather_gov: String,
    pub wttr_in: String,
    pub waqi: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_gov: "https://api.weather.gov".to_string(),
            wttr_in: "https://wttr.in".to_string(),
            waqi: "https://api.waqi.info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prepend the forecast period name, e.g. "Tonight".
    pub period_name: bool,
    /// Append the AQI severity label after the number.
    pub aqi_label: bool,
    /// Value of the wttr.in `format` query parameter.
    pub wttr_format: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            period_name: false,
            aqi_label: false,
            wttr_format: DEFAULT_WTTR_FORMAT.to_string(),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub cache_path: PathBuf,
    pub cache_timeout: Duration,
    /// Gridpoint segment, `{office}/{x},{y}`.
    pub weather_gov: String,
    /// wttr.in location; conditions are skipped when absent.
    pub wttr_in: Option<String>,
    /// api.waqi.info feed segment, e.g. `@5933/?token=...`; AQI is skipped when absent.
    pub waqi: Option<String>,
    pub format: FormatOptions,
    pub endpoints: Endpoints,
}

impl ReportConfig {
    /// Config with defaults for everything but the cache file.
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            cache_timeout: Duration::from_secs(DEFAULT_CACHE_TIMEOUT_SECS),
            weather_gov: DEFAULT_WEATHER_GOV.to_string(),
            wttr_in: None,
            waqi: None,
            format: FormatOptions::default(),
            endpoints: Endpoints::default(),
        }
    }

    /// Merge command-line overrides over the config file over built-in defaults.
    pub fn resolve(file: FileConfig, overrides: ConfigOverrides) -> Result<Self> {
        let cache_path = match overrides.cache.or(file.cache) {
            Some(path) => path,
            None => default_cache_path()?,
        };

        let timeout_secs = overrides
            .cache_timeout
            .or(file.cache_timeout)
            .unwrap_or(DEFAULT_CACHE_TIMEOUT_SECS);

        let defaults = FormatOptions::default();
        let format = FormatOptions {
            period_name: overrides
                .period_name
                .or(file.period_name)
                .unwrap_or(defaults.period_name),
            aqi_label: overrides
                .aqi_label
                .or(file.aqi_label)
                .unwrap_or(defaults.aqi_label),
            wttr_format: overrides
                .wttr_format
                .or(file.wttr_format)
                .unwrap_or(defaults.wttr_format),
        };

        Ok(Self {
            cache_path,
            cache_timeout: Duration::from_secs(timeout_secs),
            weather_gov: overrides
                .weather_gov
                .or(file.weather_gov)
                .unwrap_or_else(|| DEFAULT_WEATHER_GOV.to_string()),
            wttr_in: non_empty(overrides.wttr_in.or(file.wttr_in)),
            waqi: non_empty(overrides.waqi.or(file.waqi)),
            format,
            endpoints: file.endpoints.unwrap_or_default(),
        })
    }

    /// Identifies what a cached report was built from.
    pub fn query_fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.weather_gov,
            self.wttr_in.as_deref().unwrap_or(""),
            self.waqi.as_deref().unwrap_or(""),
            self.format.period_name,
            self.format.aqi_label,
            self.format.wttr_format,
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// `$HOME/.cache/weatherparse-cache.json`
pub fn default_cache_path() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or_else(|| anyhow!("Could not determine home directory"))?;

    Ok(dirs.home_dir().join(".cache").join("weatherparse-cache.json"))
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cache: Option<PathBuf>,
    pub cache_timeout: Option<u64>,
    pub weather_gov: Option<String>,
    pub wttr_in: Option<String>,
    pub waqi: Option<String>,
    pub period_name: Option<bool>,
    pub aqi_label: Option<bool>,
    pub wttr_format: Option<String>,
}

/// Optional config file. Every key may be omitted.
///
/// Example TOML:
/// weather_gov = "MKX/37,61"
/// wttr_in = "53711"
/// period_name = true
///
/// [endpoints]
/// weather_gov = "https://api.weather.gov"
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub cache: Option<PathBuf>,
    pub cache_timeout: Option<u64>,
    pub weather_gov: Option<String>,
    pub wttr_in: Option<String>,
    pub waqi: Option<String>,
    pub period_name: Option<bool>,
    pub aqi_label: Option<bool>,
    pub wttr_format: Option<String>,
    pub endpoints: Option<Endpoints>,
}

impl FileConfig {
    /// Load an explicitly named file, or the platform default if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let Ok(path) = Self::config_file_path() else {
                    return Ok(Self::default());
                };
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::read(&path)
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherparse", "weatherparse")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
