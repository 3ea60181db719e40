//! Provider-shaped payload builders for unit tests.

use serde_json::{Map, Value, json};

use super::window::Direction;

pub(crate) fn departure(flight_number: &str, destination: &str, scheduled: Option<i64>) -> Value {
    json!({
        "flight": {
            "identification": { "number": { "default": flight_number } },
            "airline": { "code": { "icao": "QFA" } },
            "aircraft": { "model": { "code": "B738", "text": "Boeing 737-838" } },
            "airport": {
                "origin": {},
                "destination": { "code": { "icao": destination } }
            },
            "time": { "scheduled": { "departure": scheduled, "arrival": null } }
        }
    })
}

pub(crate) fn arrival(flight_number: &str, origin: &str, scheduled: Option<i64>) -> Value {
    json!({
        "flight": {
            "identification": { "number": { "default": flight_number } },
            "airline": { "code": { "icao": "VOZ" } },
            "aircraft": { "model": { "code": "73H", "text": "Boeing 737-8FE" } },
            "airport": {
                "origin": { "code": { "icao": origin } },
                "destination": {}
            },
            "time": { "scheduled": { "departure": null, "arrival": scheduled } }
        }
    })
}

pub(crate) fn page(direction: Direction, total: u32, records: Vec<Value>) -> Value {
    let mut schedule = Map::new();
    schedule.insert(
        direction.mode().to_string(),
        json!({ "page": { "total": total }, "data": records }),
    );
    json!({
        "result": { "response": { "airport": { "pluginData": { "schedule": schedule }}}}
    })
}
