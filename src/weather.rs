use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::error::{Endpoint, WeatherError};

pub const FORECAST_DAYS: usize = 7;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country: String,
}

impl Location {
    /// "London, UK" style header text.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// °C
    pub temperature: f64,
    /// Percent
    pub humidity: u8,
    pub weather_code: i32,
    /// km/h
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub max_temperature: f64,
    pub min_temperature: f64,
    /// mm
    pub precipitation: f64,
}

/// Current conditions and daily forecast from a single forecast response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecastEntry>,
}

// API response structs
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: u8,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_sum: Vec<f64>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Self {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            country: result.country.unwrap_or_default(),
        }
    }
}

impl TryFrom<ForecastResponse> for WeatherReport {
    type Error = WeatherError;

    fn try_from(response: ForecastResponse) -> Result<Self, Self::Error> {
        let daily = response.daily;
        check_len("time", daily.time.len())?;
        check_len("weather_code", daily.weather_code.len())?;
        check_len("temperature_2m_max", daily.temperature_2m_max.len())?;
        check_len("temperature_2m_min", daily.temperature_2m_min.len())?;
        check_len("precipitation_sum", daily.precipitation_sum.len())?;

        let entries = daily
            .time
            .iter()
            .enumerate()
            .map(|(i, raw_date)| -> Result<DailyForecastEntry, WeatherError> {
                let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|source| {
                    WeatherError::InvalidDate {
                        value: raw_date.clone(),
                        source,
                    }
                })?;
                Ok(DailyForecastEntry {
                    date,
                    weather_code: daily.weather_code[i],
                    max_temperature: daily.temperature_2m_max[i],
                    min_temperature: daily.temperature_2m_min[i],
                    precipitation: daily.precipitation_sum[i],
                })
            })
            .collect::<Result<Vec<_>, WeatherError>>()?;

        let current = response.current;
        Ok(Self {
            current: CurrentConditions {
                temperature: current.temperature_2m,
                humidity: current.relative_humidity_2m,
                weather_code: current.weather_code,
                wind_speed: current.wind_speed_10m,
            },
            daily: entries,
        })
    }
}

fn check_len(field: &'static str, found: usize) -> Result<(), WeatherError> {
    if found == FORECAST_DAYS {
        Ok(())
    } else {
        Err(WeatherError::ForecastLength {
            field,
            found,
            expected: FORECAST_DAYS,
        })
    }
}

/// Client for the geocoding and forecast endpoints.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl WeatherClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            geocoding_url: settings.geocoding_url.clone(),
            forecast_url: settings.forecast_url.clone(),
        })
    }

    /// Best English match for `city`, or `None` when the geocoder has no result.
    #[instrument(skip(self))]
    pub async fn resolve_location(&self, city: &str) -> Result<Option<Location>, WeatherError> {
        let request = self.http.get(&self.geocoding_url).query(&[
            ("name", city),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ]);
        let response: GeocodingResponse = send_json(request, Endpoint::Geocoding).await?;

        let location = response
            .results
            .and_then(|results| results.into_iter().next())
            .map(Location::from);
        match &location {
            Some(found) => debug!(
                name = %found.name,
                lat = found.latitude,
                lon = found.longitude,
                "resolved location"
            ),
            None => debug!("geocoder returned no results"),
        }
        Ok(location)
    }

    #[instrument(skip(self, location), fields(name = %location.name))]
    pub async fn fetch_weather(&self, location: &Location) -> Result<WeatherReport, WeatherError> {
        let request = self.http.get(&self.forecast_url).query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ]);
        let response: ForecastResponse = send_json(request, Endpoint::Forecast).await?;
        let report = WeatherReport::try_from(response)?;
        debug!(days = report.daily.len(), "fetched forecast");
        Ok(report)
    }
}

async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: Endpoint,
) -> Result<T, WeatherError> {
    let response = request
        .send()
        .await
        .map_err(|source| WeatherError::Network { endpoint, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::UnexpectedStatus {
            endpoint,
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| WeatherError::Network { endpoint, source })?;
    serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
}
