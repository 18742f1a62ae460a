use std::any::Any;
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::runtime::Runtime;
use tracing::{debug, error, info, warn};

use crate::error::InputError;
use crate::weather::{Location, WeatherClient, WeatherReport};

pub const IDLE_STATUS: &str = "Enter a city name and click Search";
pub const SEARCHING_STATUS: &str = "Fetching weather data...";

/// Trim a raw search box value, refusing anything blank.
pub fn validate_query(raw: &str) -> Result<String, InputError> {
    let city = raw.trim();
    if city.is_empty() {
        Err(InputError::EmptyQuery)
    } else {
        Ok(city.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching { generation: u64 },
}

/// How the most recent search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    NotFoundError,
    FetchFailedError,
    UnhandledError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success {
        location: Location,
        report: WeatherReport,
    },
    NotFound {
        city: String,
    },
    FetchFailed {
        message: String,
    },
    Unhandled {
        message: String,
    },
}

impl SearchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            SearchOutcome::Success { .. } => OutcomeKind::Success,
            SearchOutcome::NotFound { .. } => OutcomeKind::NotFoundError,
            SearchOutcome::FetchFailed { .. } => OutcomeKind::FetchFailedError,
            SearchOutcome::Unhandled { .. } => OutcomeKind::UnhandledError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A modal message waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// A search that has been accepted and needs to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub city: String,
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub generation: u64,
    pub outcome: SearchOutcome,
}

/// Result data the UI should render after a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub location: Location,
    pub report: WeatherReport,
}

/// Search state machine driving the status line and modal notices.
///
/// Every accepted submission bumps a generation counter. A completion only
/// takes effect when it carries the latest generation, so an older search
/// that finishes late cannot overwrite a newer one.
#[derive(Debug)]
pub struct SearchController {
    state: SearchState,
    status: String,
    notice: Option<Notice>,
    last_outcome: Option<OutcomeKind>,
    generation: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            status: IDLE_STATUS.to_string(),
            notice: None,
            last_outcome: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn last_outcome(&self) -> Option<OutcomeKind> {
        self.last_outcome
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Accept or reject a search box submission.
    ///
    /// Blank input leaves the state untouched and raises a warning.
    pub fn submit(&mut self, raw: &str) -> Result<SearchTicket, InputError> {
        let city = match validate_query(raw) {
            Ok(city) => city,
            Err(e) => {
                warn!("rejected empty search");
                self.notice = Some(Notice::warning("Input Error", e.to_string()));
                return Err(e);
            }
        };

        self.generation += 1;
        self.state = SearchState::Searching {
            generation: self.generation,
        };
        self.status = SEARCHING_STATUS.to_string();
        info!(city = %city, generation = self.generation, "search dispatched");

        Ok(SearchTicket {
            generation: self.generation,
            city,
        })
    }

    /// Apply a finished search. Returns what to render on success.
    pub fn complete(&mut self, completion: SearchCompletion) -> Option<RenderRequest> {
        if completion.generation != self.generation {
            debug!(
                stale = completion.generation,
                latest = self.generation,
                "dropping superseded search result"
            );
            return None;
        }

        self.state = SearchState::Idle;
        self.last_outcome = Some(completion.outcome.kind());

        match completion.outcome {
            SearchOutcome::Success { location, report } => {
                self.status = format!("Weather for {}", location.display_name());
                info!(location = %location.display_name(), "search succeeded");
                Some(RenderRequest { location, report })
            }
            SearchOutcome::NotFound { city } => {
                self.notice = Some(Notice::error(format!("City '{city}' not found")));
                self.status = "City not found. Try again.".to_string();
                None
            }
            SearchOutcome::FetchFailed { message } => {
                warn!(error = %message, "forecast fetch failed");
                self.notice = Some(Notice::error("Could not fetch weather data"));
                self.status = "Failed to fetch weather data".to_string();
                None
            }
            SearchOutcome::Unhandled { message } => {
                error!(error = %message, "search failed");
                self.notice = Some(Notice::error(format!("An error occurred: {message}")));
                self.status = "An error occurred".to_string();
                None
            }
        }
    }
}

/// Geocode `city`, then fetch its forecast. The forecast call is skipped
/// when geocoding finds nothing.
pub async fn run_search(client: &WeatherClient, city: &str) -> SearchOutcome {
    let location = match client.resolve_location(city).await {
        Ok(Some(location)) => location,
        Ok(None) => {
            return SearchOutcome::NotFound {
                city: city.to_string(),
            }
        }
        Err(e) => {
            return SearchOutcome::Unhandled {
                message: e.to_string(),
            }
        }
    };

    match client.fetch_weather(&location).await {
        Ok(report) => SearchOutcome::Success { location, report },
        Err(e) => SearchOutcome::FetchFailed {
            message: e.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "search task panicked".to_string()
    }
}

/// Runs searches off the UI thread and hands results back over a channel.
pub struct SearchWorker {
    runtime: Runtime,
    client: WeatherClient,
    sender: Sender<SearchCompletion>,
    receiver: Receiver<SearchCompletion>,
}

impl SearchWorker {
    pub fn new(client: WeatherClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("weather-search")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            runtime,
            client,
            sender,
            receiver,
        })
    }

    /// Start a search in the background. `notify` is called once the
    /// completion has been queued, e.g. to wake the UI.
    pub fn dispatch<F>(&self, ticket: SearchTicket, notify: F)
    where
        F: Fn() + Send + 'static,
    {
        let client = self.client.clone();
        let sender = self.sender.clone();
        let SearchTicket { generation, city } = ticket;

        let task = self
            .runtime
            .spawn(async move { run_search(&client, &city).await });

        self.runtime.spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => SearchOutcome::Unhandled {
                    message: panic_message(e.into_panic().as_ref()),
                },
                Err(e) => SearchOutcome::Unhandled {
                    message: e.to_string(),
                },
            };
            if sender.send(SearchCompletion { generation, outcome }).is_err() {
                debug!(generation, "ui went away before search finished");
                return;
            }
            notify();
        });
    }

    /// Drain any finished searches without blocking.
    pub fn poll(&self) -> Vec<SearchCompletion> {
        self.receiver.try_iter().collect()
    }

    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<SearchCompletion, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::weather::{CurrentConditions, DailyForecastEntry};

    fn london() -> Location {
        Location {
            latitude: 51.51,
            longitude: -0.13,
            name: "London".to_string(),
            country: "UK".to_string(),
        }
    }

    fn report() -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                temperature: 15.2,
                humidity: 70,
                weather_code: 2,
                wind_speed: 9.4,
            },
            daily: (1..=7)
                .map(|day| DailyForecastEntry {
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    weather_code: 1,
                    max_temperature: 12.0,
                    min_temperature: 4.0,
                    precipitation: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn validate_query_trims_and_rejects_blank() {
        assert_eq!(validate_query("  Paris \t").unwrap(), "Paris");
        assert_eq!(validate_query(""), Err(InputError::EmptyQuery));
        assert_eq!(validate_query(" \n\t "), Err(InputError::EmptyQuery));
    }

    #[test]
    fn blank_submit_warns_and_stays_idle() {
        let mut controller = SearchController::new();
        assert!(controller.submit("   ").is_err());

        assert_eq!(controller.state(), SearchState::Idle);
        assert_eq!(controller.status(), IDLE_STATUS);
        let notice = controller.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.title, "Input Error");
        assert_eq!(notice.message, "Please enter a city name");
    }

    #[test]
    fn submit_enters_searching() {
        let mut controller = SearchController::new();
        let ticket = controller.submit(" London ").unwrap();

        assert_eq!(ticket.city, "London");
        assert_eq!(
            controller.state(),
            SearchState::Searching {
                generation: ticket.generation
            }
        );
        assert_eq!(controller.status(), SEARCHING_STATUS);
    }

    #[test]
    fn success_sets_status_and_returns_render_request() {
        let mut controller = SearchController::new();
        let ticket = controller.submit("London").unwrap();
        let render = controller
            .complete(SearchCompletion {
                generation: ticket.generation,
                outcome: SearchOutcome::Success {
                    location: london(),
                    report: report(),
                },
            })
            .unwrap();

        assert_eq!(render.location, london());
        assert_eq!(controller.state(), SearchState::Idle);
        assert_eq!(controller.status(), "Weather for London, UK");
        assert_eq!(controller.last_outcome(), Some(OutcomeKind::Success));
        assert!(controller.notice().is_none());
    }

    #[test]
    fn not_found_names_the_city() {
        let mut controller = SearchController::new();
        let ticket = controller.submit("Zzzxy123").unwrap();
        let render = controller.complete(SearchCompletion {
            generation: ticket.generation,
            outcome: SearchOutcome::NotFound {
                city: "Zzzxy123".to_string(),
            },
        });

        assert!(render.is_none());
        assert_eq!(controller.state(), SearchState::Idle);
        assert_eq!(controller.last_outcome(), Some(OutcomeKind::NotFoundError));
        assert_eq!(controller.status(), "City not found. Try again.");
        assert_eq!(
            controller.notice().unwrap().message,
            "City 'Zzzxy123' not found"
        );
    }

    #[test]
    fn fetch_failure_shows_generic_message() {
        let mut controller = SearchController::new();
        let ticket = controller.submit("London").unwrap();
        let render = controller.complete(SearchCompletion {
            generation: ticket.generation,
            outcome: SearchOutcome::FetchFailed {
                message: "connection reset".to_string(),
            },
        });

        assert!(render.is_none());
        assert_eq!(controller.last_outcome(), Some(OutcomeKind::FetchFailedError));
        assert_eq!(controller.status(), "Failed to fetch weather data");
        assert_eq!(
            controller.notice().unwrap().message,
            "Could not fetch weather data"
        );
    }

    #[test]
    fn unhandled_error_surfaces_message() {
        let mut controller = SearchController::new();
        let ticket = controller.submit("London").unwrap();
        controller.complete(SearchCompletion {
            generation: ticket.generation,
            outcome: SearchOutcome::Unhandled {
                message: "boom".to_string(),
            },
        });

        assert_eq!(controller.last_outcome(), Some(OutcomeKind::UnhandledError));
        assert_eq!(controller.status(), "An error occurred");
        assert_eq!(controller.notice().unwrap().message, "An error occurred: boom");

        controller.dismiss_notice();
        assert!(controller.notice().is_none());
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut controller = SearchController::new();
        let first = controller.submit("London").unwrap();
        let second = controller.submit("Paris").unwrap();
        assert!(second.generation > first.generation);

        let render = controller.complete(SearchCompletion {
            generation: first.generation,
            outcome: SearchOutcome::Success {
                location: london(),
                report: report(),
            },
        });

        assert!(render.is_none());
        assert_eq!(
            controller.state(),
            SearchState::Searching {
                generation: second.generation
            }
        );
        assert_eq!(controller.status(), SEARCHING_STATUS);
        assert!(controller.last_outcome().is_none());
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("bad index");
        assert_eq!(panic_message(payload.as_ref()), "bad index");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(payload.as_ref()), "search task panicked");
    }
}
