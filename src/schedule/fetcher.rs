//! Paginated retrieval of one direction of an airport schedule.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::normalize::{NormalizedFlight, normalize};
use super::page::Page;
use super::record::RawFlightRecord;
use super::window::{Direction, ScheduleWindow};
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::services::page_source::{PageRequest, PageSource};

/// Walks the provider's pages for a window until the day is covered.
///
/// Pages are requested strictly in order: the page count is only known from
/// page 1, and the stopping rule needs each page's records before deciding
/// whether to ask for the next one.
pub struct ScheduleFetcher<S> {
    source: S,
    page_size: u32,
    page_timeout: Duration,
    fetch_budget: Duration,
}

impl<S: PageSource> ScheduleFetcher<S> {
    pub fn new(source: S, config: &FetchConfig) -> Self {
        Self {
            source,
            page_size: config.page_size,
            page_timeout: config.page_timeout,
            fetch_budget: config.fetch_budget,
        }
    }

    /// Fetches raw records for `direction` at `airport`, starting the window
    /// at `window_start` or now.
    ///
    /// The result is not trimmed to the window; records past the day
    /// boundary are dropped by [`normalize`].
    pub async fn fetch(
        &self,
        airport: &str,
        direction: Direction,
        window_start: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawFlightRecord>> {
        let window = ScheduleWindow::new(airport, direction, window_start.unwrap_or_else(Utc::now));
        self.fetch_window(&window).await
    }

    #[tracing::instrument(
        skip(self, window),
        fields(airport = %window.airport, direction = %window.direction, window_start = %window.window_start)
    )]
    pub async fn fetch_window(&self, window: &ScheduleWindow) -> Result<Vec<RawFlightRecord>> {
        let deadline = Instant::now() + self.fetch_budget;
        let boundary = window.next_day_start();

        let first = self.request(window, 1, deadline).await?;
        let total_pages = first.total_pages;
        let mut flights = first.records;
        let mut pages_read = 1;

        for page in 2..=total_pages {
            let next = self.request(window, page, deadline).await?;
            flights.extend(next.records);
            pages_read = page;

            if day_done(&flights, window.direction, boundary)? {
                debug!(page, total_pages, "Day boundary crossed, stopping");
                break;
            }
        }

        info!(
            pages_read,
            total_pages,
            flights = flights.len(),
            "Schedule fetched"
        );
        Ok(flights)
    }

    /// Fetches departures then arrivals for the day and merges their
    /// normalized projections, departures first.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_day(
        &self,
        airport: &str,
        window_start: Option<DateTime<Utc>>,
    ) -> Result<Vec<NormalizedFlight>> {
        let window_start = window_start.unwrap_or_else(Utc::now);

        let departures = self
            .fetch(airport, Direction::Departure, Some(window_start))
            .await?;
        let arrivals = self
            .fetch(airport, Direction::Arrival, Some(window_start))
            .await?;

        let mut flights = normalize(&departures, window_start, airport)?;
        flights.extend(normalize(&arrivals, window_start, airport)?);
        Ok(flights)
    }

    async fn request(&self, window: &ScheduleWindow, page: u32, deadline: Instant) -> Result<Page> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(Error::transport(format!(
                "fetch budget of {}s exhausted before page {page}",
                self.fetch_budget.as_secs()
            )));
        }

        let request = PageRequest {
            airport: window.airport.clone(),
            direction: window.direction,
            timestamp: window.window_start.timestamp(),
            page,
            limit: self.page_size,
        };
        let limit = self.page_timeout.min(remaining);

        debug!(page, "Requesting schedule page");
        let payload = tokio::time::timeout(limit, self.source.request_page(&request))
            .await
            .map_err(|_| {
                Error::transport(format!("page {page} timed out after {}ms", limit.as_millis()))
            })??;

        Page::from_response(&payload, window.direction)
    }
}

/// True once the last accumulated record is scheduled after `boundary`.
///
/// A last record without a scheduled time never ends the walk.
fn day_done(flights: &[RawFlightRecord], direction: Direction, boundary: DateTime<Utc>) -> Result<bool> {
    match flights.last() {
        Some(last) => Ok(last.scheduled(direction)?.is_some_and(|t| t > boundary)),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::testing::{arrival, departure, page};
    use chrono::TimeZone;
    use serde_json::Value;
    use std::sync::Mutex;

    const JAN_1: i64 = 1704067200;
    const HOUR: i64 = 3600;

    struct MockSource {
        pages: Vec<Value>,
        requested: Mutex<Vec<u32>>,
        delay: Option<Duration>,
    }

    impl MockSource {
        fn new(pages: Vec<Value>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PageSource for MockSource {
        async fn request_page(&self, request: &PageRequest) -> Result<Value> {
            self.requested.lock().unwrap().push(request.page);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.pages
                .get(request.page as usize - 1)
                .cloned()
                .ok_or_else(|| Error::transport("HTTP 404"))
        }
    }

    fn fetcher(source: MockSource) -> ScheduleFetcher<MockSource> {
        ScheduleFetcher::new(source, &FetchConfig::default())
    }

    fn jan_1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn departures_page(total: u32, numbers: &[(&str, Option<i64>)]) -> Value {
        let records = numbers
            .iter()
            .map(|(n, t)| departure(n, "YMML", *t))
            .collect();
        page(Direction::Departure, total, records)
    }

    fn numbers(records: &[RawFlightRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.flight_number().unwrap().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_stops_after_page_crossing_day_boundary() {
        let source = MockSource::new(vec![
            departures_page(3, &[("QF1", Some(JAN_1 + HOUR)), ("QF2", Some(JAN_1 + 10 * HOUR))]),
            departures_page(3, &[("QF3", Some(JAN_1 + 20 * HOUR)), ("QF4", Some(JAN_1 + 25 * HOUR))]),
            departures_page(3, &[("QF5", Some(JAN_1 + 30 * HOUR))]),
        ]);
        let fetcher = fetcher(source);

        let records = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(numbers(&records), vec!["QF1", "QF2", "QF3", "QF4"]);
        assert_eq!(fetcher.source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_single_page_issues_one_request() {
        let source = MockSource::new(vec![departures_page(
            1,
            &[("QF1", Some(JAN_1 + HOUR)), ("QF9", Some(JAN_1 + 40 * HOUR))],
        )]);
        let fetcher = fetcher(source);

        let records = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(fetcher.source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn test_page_one_crossing_boundary_does_not_stop_walk() {
        // The rule is only evaluated from page 2 onwards.
        let source = MockSource::new(vec![
            departures_page(2, &[("QF1", Some(JAN_1 + 30 * HOUR))]),
            departures_page(2, &[("QF2", Some(JAN_1 + 31 * HOUR))]),
        ]);
        let fetcher = fetcher(source);

        fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(fetcher.source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_null_last_time_keeps_paginating() {
        let source = MockSource::new(vec![
            departures_page(3, &[("QF1", Some(JAN_1 + HOUR))]),
            departures_page(3, &[("QF2", Some(JAN_1 + 30 * HOUR)), ("QF3", None)]),
            departures_page(3, &[("QF4", Some(JAN_1 + 31 * HOUR))]),
        ]);
        let fetcher = fetcher(source);

        let records = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(fetcher.source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_time_exactly_at_boundary_does_not_stop() {
        let source = MockSource::new(vec![
            departures_page(3, &[("QF1", Some(JAN_1 + HOUR))]),
            departures_page(3, &[("QF2", Some(JAN_1 + 24 * HOUR))]),
            departures_page(3, &[("QF3", Some(JAN_1 + 26 * HOUR))]),
        ]);
        let fetcher = fetcher(source);

        fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(fetcher.source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_arrivals_use_arrival_time() {
        let source = MockSource::new(vec![
            page(Direction::Arrival, 3, vec![arrival("VA1", "NZAA", Some(JAN_1 + HOUR))]),
            page(Direction::Arrival, 3, vec![arrival("VA2", "NZAA", Some(JAN_1 + 26 * HOUR))]),
            page(Direction::Arrival, 3, vec![arrival("VA3", "NZAA", Some(JAN_1 + 27 * HOUR))]),
        ]);
        let fetcher = fetcher(source);

        let records = fetcher
            .fetch("YSSY", Direction::Arrival, Some(jan_1()))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(fetcher.source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_transport_error_aborts_fetch() {
        // Page 2 is missing from the mock, so its request fails.
        let source = MockSource::new(vec![departures_page(3, &[("QF1", Some(JAN_1))])]);
        let fetcher = fetcher(source);

        let err = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(fetcher.source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_malformed_page_aborts_fetch() {
        let source = MockSource::new(vec![
            departures_page(3, &[("QF1", Some(JAN_1))]),
            serde_json::json!({ "result": { "response": {} } }),
            departures_page(3, &[("QF3", Some(JAN_1))]),
        ]);
        let fetcher = fetcher(source);

        let err = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert_eq!(fetcher.source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let mut source = MockSource::new(vec![departures_page(1, &[])]);
        source.delay = Some(Duration::from_secs(5));
        let config = FetchConfig {
            page_timeout: Duration::from_millis(20),
            ..FetchConfig::default()
        };
        let fetcher = ScheduleFetcher::new(source, &config);

        let err = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_exhausted_budget_fails_before_requesting() {
        let config = FetchConfig {
            fetch_budget: Duration::ZERO,
            ..FetchConfig::default()
        };
        let fetcher = ScheduleFetcher::new(MockSource::new(vec![]), &config);

        let err = fetcher
            .fetch("YSSY", Direction::Departure, Some(jan_1()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert!(fetcher.source.requested().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_day_merges_departures_then_arrivals() {
        struct BothSource;

        #[async_trait::async_trait]
        impl PageSource for BothSource {
            async fn request_page(&self, request: &PageRequest) -> Result<Value> {
                Ok(match request.direction {
                    Direction::Departure => page(
                        Direction::Departure,
                        1,
                        vec![
                            departure("QF1", "YMML", Some(JAN_1 + HOUR)),
                            departure("QF2", "YMML", Some(JAN_1 + 25 * HOUR)),
                        ],
                    ),
                    Direction::Arrival => page(
                        Direction::Arrival,
                        1,
                        vec![arrival("VA1", "NZAA", Some(JAN_1 + 2 * HOUR))],
                    ),
                })
            }
        }

        let fetcher = ScheduleFetcher::new(BothSource, &FetchConfig::default());
        let flights = fetcher.fetch_day("YSSY", Some(jan_1())).await.unwrap();

        let summary: Vec<(&str, &str, &str)> = flights
            .iter()
            .map(|f| (f.flight_number.as_str(), f.origin.as_str(), f.destination.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("QF1", "YSSY", "YMML"), ("VA1", "NZAA", "YSSY")]
        );
    }
}
