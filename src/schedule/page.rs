//! Extraction of one schedule page from a provider payload.

use serde_json::Value;

use super::record::RawFlightRecord;
use super::window::Direction;
use crate::error::{Error, Result};

const SCHEDULE_PATH: [&str; 5] = ["result", "response", "airport", "pluginData", "schedule"];

/// Records of one page plus the page count the provider reports for the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<RawFlightRecord>,
    pub total_pages: u32,
}

impl Page {
    /// Reads `result.response.airport.pluginData.schedule.{mode}` from `response`.
    ///
    /// Every key down to the direction object, plus `page.total`, is
    /// structural. `data` set to `null` means an empty page; a missing or
    /// non-array `data` is malformed.
    pub fn from_response(response: &Value, direction: Direction) -> Result<Self> {
        let mut node = response;
        let mut path = String::new();
        for key in SCHEDULE_PATH.iter().copied().chain([direction.mode()]) {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(key);
            node = node
                .get(key)
                .filter(|v| v.is_object())
                .ok_or_else(|| Error::malformed_response(path.as_str()))?;
        }

        let total = node["page"]["total"]
            .as_u64()
            .ok_or_else(|| Error::malformed_response(format!("{path}.page.total")))?;

        let records = match node.get("data") {
            Some(Value::Array(items)) => items.iter().cloned().map(RawFlightRecord::from).collect(),
            Some(Value::Null) => Vec::new(),
            _ => return Err(Error::malformed_response(format!("{path}.data"))),
        };

        Ok(Self {
            records,
            // An empty schedule is still one page.
            total_pages: u32::try_from(total).unwrap_or(u32::MAX).max(1),
        })
    }
}
