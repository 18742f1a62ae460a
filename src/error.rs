use std::fmt;

use thiserror::Error;

/// Which of the two upstream endpoints a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocoding,
    Forecast,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Geocoding => write!(f, "geocoding"),
            Endpoint::Forecast => write!(f, "forecast"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{endpoint} request failed: {source}")]
    Network {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {endpoint} endpoint")]
    UnexpectedStatus { endpoint: Endpoint, status: u16 },

    #[error("malformed {endpoint} response: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("forecast field `{field}` has {found} entries, expected {expected}")]
    ForecastLength {
        field: &'static str,
        found: usize,
        expected: usize,
    },

    #[error("invalid forecast date \"{value}\": {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Rejected before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a city name")]
    EmptyQuery,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got \"{value}\"")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must be an http(s) URL, got \"{value}\"")]
    InvalidUrl { name: &'static str, value: String },
}
