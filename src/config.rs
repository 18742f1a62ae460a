use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crate::error::ConfigError;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const GEOCODING_URL_VAR: &str = "WEATHER_GEOCODING_URL";
const FORECAST_URL_VAR: &str = "WEATHER_FORECAST_URL";
const TIMEOUT_VAR: &str = "WEATHER_TIMEOUT_SECS";

/// Look up a city's current conditions and 7-day forecast.
#[derive(Debug, Default, Parser)]
#[command(name = "weather_app", version)]
pub struct Cli {
    /// City to search for as soon as the window opens
    #[arg(long)]
    pub city: Option<String>,

    /// Geocoding endpoint (overrides WEATHER_GEOCODING_URL)
    #[arg(long)]
    pub geocoding_url: Option<String>,

    /// Forecast endpoint (overrides WEATHER_FORECAST_URL)
    #[arg(long)]
    pub forecast_url: Option<String>,

    /// HTTP timeout in seconds; unset means wait indefinitely
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log filter, e.g. "debug" or "weather_app=trace" (overrides RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout: Option<Duration>,
    pub initial_city: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            timeout: None,
            initial_city: None,
        }
    }
}

impl Settings {
    /// Command-line flags win over environment variables, which win over defaults.
    pub fn from_sources<F>(cli: &Cli, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let geocoding_url = pick_url(cli.geocoding_url.clone(), GEOCODING_URL_VAR, &env)?
            .unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_string());
        let forecast_url = pick_url(cli.forecast_url.clone(), FORECAST_URL_VAR, &env)?
            .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_string());

        let timeout_secs = match cli.timeout_secs {
            Some(secs) => Some(secs),
            None => match env(TIMEOUT_VAR) {
                Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                    ConfigError::InvalidTimeout {
                        name: TIMEOUT_VAR,
                        value: raw.clone(),
                    }
                })?),
                None => None,
            },
        };

        let initial_city = cli
            .city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(str::to_string);

        Ok(Self {
            geocoding_url,
            forecast_url,
            timeout: timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
            initial_city,
        })
    }

    pub fn from_env(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_sources(cli, |name| std::env::var(name).ok())
    }
}

fn pick_url<F>(flag: Option<String>, var: &'static str, env: &F) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = flag.or_else(|| env(var)) else {
        return Ok(None);
    };
    let value = value.trim().to_string();
    match reqwest::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(Some(value))
        }
        _ => Err(ConfigError::InvalidUrl { name: var, value }),
    }
}

/// Candidate `.env` locations, most specific first.
fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env")];

    // Packaged macOS apps run from .app/Contents/MacOS/
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(contents_dir) = exe_dir.parent() {
                paths.push(contents_dir.join("Resources").join(".env"));
            }
            paths.push(exe_dir.join(".env"));
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        paths.push(PathBuf::from(home).join(".weather_app.env"));
    }

    paths
}

/// Load the first `.env` file found and return its path. Missing files are
/// not an error.
///
/// Usually called before logging is set up, so the caller reports the result.
pub fn load_env_file() -> Option<PathBuf> {
    load_first_env_file(env_file_candidates())
}

fn load_first_env_file<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates
        .into_iter()
        .filter(|path| path.exists())
        .find(|path| dotenv::from_path(path).is_ok())
}
