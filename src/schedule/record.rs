//! Null-safe access to a provider flight record.
//!
//! A record is kept as the provider delivered it so callers can persist and
//! reload it untouched. Each accessor states its own fallback policy:
//! structural keys fail with [`Error::MalformedField`], leaf values come back
//! as `Option` and are defaulted by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::window::Direction;
use crate::error::{Error, Result};

/// One flight entry as returned inside a schedule page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawFlightRecord(Value);

impl From<Value> for RawFlightRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl RawFlightRecord {
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }

    fn flight(&self) -> Result<&Value> {
        non_null(&self.0["flight"]).ok_or_else(|| Error::malformed_field("flight"))
    }

    fn airport(&self) -> Result<&Value> {
        non_null(&self.flight()?["airport"]).ok_or_else(|| Error::malformed_field("flight.airport"))
    }

    /// ICAO code of the origin airport. Departures omit it.
    pub fn origin_code(&self) -> Result<Option<&str>> {
        Ok(text(&self.airport()?["origin"]["code"]["icao"]))
    }

    /// ICAO code of the destination airport. Arrivals omit it.
    pub fn destination_code(&self) -> Result<Option<&str>> {
        Ok(text(&self.airport()?["destination"]["code"]["icao"]))
    }

    /// A record carrying an origin code object is an arrival at the queried
    /// airport, even when that object has no ICAO code.
    pub fn inferred_direction(&self) -> Result<Direction> {
        let code = &self.airport()?["origin"]["code"];
        Ok(match code.as_object() {
            Some(fields) if !fields.is_empty() => Direction::Arrival,
            _ => Direction::Departure,
        })
    }

    pub fn airline_code(&self) -> Result<Option<&str>> {
        Ok(text(&self.flight()?["airline"]["code"]["icao"]))
    }

    pub fn aircraft_code(&self) -> Result<Option<&str>> {
        Ok(text(&self.flight()?["aircraft"]["model"]["code"]))
    }

    pub fn aircraft_name(&self) -> Result<Option<&str>> {
        Ok(text(&self.flight()?["aircraft"]["model"]["text"]))
    }

    /// Whether the provider sent an aircraft object at all.
    pub fn has_aircraft(&self) -> Result<bool> {
        Ok(non_null(&self.flight()?["aircraft"]).is_some())
    }

    pub fn flight_number(&self) -> Result<Option<&str>> {
        Ok(text(&self.flight()?["identification"]["number"]["default"]))
    }

    /// Scheduled time on the given side of the flight, if the provider has one.
    ///
    /// Unix seconds may arrive as an integer, a float or a numeric string.
    pub fn scheduled(&self, direction: Direction) -> Result<Option<DateTime<Utc>>> {
        let raw = &self.flight()?["time"]["scheduled"][direction.time_field()];
        let time = unix_seconds(raw).and_then(|secs| DateTime::from_timestamp(secs, 0));
        if time.is_none() && !raw.is_null() {
            debug!(value = %raw, direction = %direction, "Unreadable scheduled time");
        }
        Ok(time)
    }
}

fn non_null(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

fn unix_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_seconds)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate_seconds))
        }
        _ => None,
    }
}

fn truncate_seconds(secs: f64) -> Option<i64> {
    let secs = secs.trunc();
    (secs.is_finite() && secs >= i64::MIN as f64 && secs < i64::MAX as f64).then_some(secs as i64)
}

fn text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}
