//! Schedule direction and the 24-hour window a request covers.

use chrono::{DateTime, Days, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which side of the airport's schedule is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[value(name = "arrivals", alias = "arrival")]
    Arrival,
    #[value(name = "departures", alias = "departure")]
    Departure,
}

impl Direction {
    /// Provider schedule mode, also the key under `pluginData.schedule`.
    pub fn mode(self) -> &'static str {
        match self {
            Direction::Arrival => "arrivals",
            Direction::Departure => "departures",
        }
    }

    /// Key under `flight.time.scheduled` holding this direction's time.
    pub fn time_field(self) -> &'static str {
        match self {
            Direction::Arrival => "arrival",
            Direction::Departure => "departure",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mode())
    }
}

/// One airport, one direction, one 24-hour window.
///
/// Only the start is stored; the end and the day boundary are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub airport: String,
    pub direction: Direction,
    pub window_start: DateTime<Utc>,
}

impl ScheduleWindow {
    pub fn new(airport: impl Into<String>, direction: Direction, window_start: DateTime<Utc>) -> Self {
        Self {
            airport: airport.into(),
            direction,
            window_start,
        }
    }

    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_start + TimeDelta::hours(24)
    }

    pub fn next_day_start(&self) -> DateTime<Utc> {
        next_day_start(self.window_start)
    }
}

/// Midnight (UTC) at the start of the calendar day after the one holding `instant`.
pub fn next_day_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    let day = instant.date_naive();
    // The last representable date has no successor; saturate there.
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    next.and_time(NaiveTime::MIN).and_utc()
}

/// Parses a window start given either as Unix seconds or as RFC 3339.
pub fn parse_window_start(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| Error::InvalidWindowStart(raw.to_string()));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidWindowStart(raw.to_string()))
}
