//! Projection of raw provider records into flat, window-filtered flights.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::RawFlightRecord;
use super::window::next_day_start;
use crate::error::Result;

/// One scheduled movement at the queried airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFlight {
    pub origin: String,
    pub destination: String,
    pub aircraft: String,
    pub airline: String,
    pub flight_number: String,
    pub scheduled: DateTime<Utc>,
}

/// Projects `records` and keeps those scheduled before the day after `window_start`.
///
/// Arrivals and departures may be mixed: each record's direction is inferred
/// from the presence of an origin code. Order is preserved.
pub fn normalize(
    records: &[RawFlightRecord],
    window_start: DateTime<Utc>,
    airport: &str,
) -> Result<Vec<NormalizedFlight>> {
    let boundary = next_day_start(window_start);
    let mut flights = Vec::with_capacity(records.len());

    for record in records {
        match project(record, airport)? {
            Some(flight) if flight.scheduled < boundary => flights.push(flight),
            _ => {}
        }
    }

    Ok(flights)
}

/// Projects a single record, or `None` when it has no scheduled time for its direction.
///
/// Missing airport codes fall back to `airport`; missing airline, aircraft
/// and flight number become empty strings.
pub fn project(record: &RawFlightRecord, airport: &str) -> Result<Option<NormalizedFlight>> {
    let direction = record.inferred_direction()?;
    let Some(scheduled) = record.scheduled(direction)? else {
        return Ok(None);
    };

    Ok(Some(NormalizedFlight {
        origin: record.origin_code()?.unwrap_or(airport).to_string(),
        destination: record.destination_code()?.unwrap_or(airport).to_string(),
        aircraft: record.aircraft_code()?.unwrap_or_default().to_string(),
        airline: record.airline_code()?.unwrap_or_default().to_string(),
        flight_number: record.flight_number()?.unwrap_or_default().to_string(),
        scheduled,
    }))
}
