pub mod app;
pub mod config;
pub mod error;
pub mod render;
pub mod search;
pub mod weather;
pub mod weather_code;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use app::WeatherApp;
pub use config::{load_env_file, Cli, Settings};
pub use error::{ConfigError, Endpoint, InputError, WeatherError};
pub use search::{run_search, SearchController, SearchOutcome, SearchWorker};
pub use weather::{Location, WeatherClient, WeatherReport};
pub use weather_code::describe;

/// `--log-level` wins over `RUST_LOG`; "info" otherwise.
pub fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // A subscriber may already be installed when embedded in another binary.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run_app(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // .env may carry RUST_LOG, so it has to be read before the subscriber exists
    let env_file = load_env_file();
    init_tracing(cli.log_level.as_deref());
    match &env_file {
        Some(path) => info!(path = %path.display(), "loaded .env file"),
        None => info!("no .env file found, using process environment only"),
    }

    let settings = Settings::from_env(&cli)?;
    info!(
        geocoding = %settings.geocoding_url,
        forecast = %settings.forecast_url,
        timeout = ?settings.timeout,
        "starting weather app"
    );

    let client = WeatherClient::new(&settings)?;
    let worker = SearchWorker::new(client)?;
    let app = WeatherApp::new(worker, settings.initial_city);

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(900.0, 700.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Weather App",
        native_options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| {
        error!(error = %e, "egui event loop failed");
        e.to_string()
    })?;

    Ok(())
}
