//! Aircraft type code to family classification.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schedule::RawFlightRecord;

/// Family assigned when no prefix matches.
pub const UNKNOWN_FAMILY: &str = "Unknown";

/// Families keyed by the first three characters of the provider's type code.
/// No prefix may appear under two families.
static FAMILIES: &[(&str, &[&str])] = &[
    ("A320", &["320", "321", "32Q", "32X", "32Y", "A20", "A21", "A32"]),
    ("A330", &["330", "332", "333", "33F", "33L", "33V", "33X", "A33"]),
    ("A340", &["340", "342", "343", "345", "346"]),
    ("A350", &["350", "351", "359", "35K", "35X", "A35"]),
    ("A380", &["380", "388", "A38"]),
    ("BA146", &["146", "B46", "14Y", "14Z"]),
    ("B717", &["717", "71F", "71M", "71Q", "71R", "71W", "B71"]),
    ("B737", &["738", "73H", "73J", "73M", "73W", "73X", "73Y", "7S8", "B38", "B73"]),
    (
        "B747",
        &["74F", "74Y", "744", "74E", "74H", "74J", "74M", "74N", "74R", "74W", "74X", "B74"],
    ),
    ("B767", &["763", "76W", "76Z", "76V"]),
    ("B777", &["77F", "77L", "77W", "77X", "77Y", "B77"]),
    ("B787", &["788", "789", "78X", "78Z", "B78"]),
    ("E190", &["E90"]),
    ("DHC8", &["DH8", "DHC", "DHT", "DH3", "DH4"]),
    ("S340", &["SF3"]),
];

/// A distinct aircraft type seen in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AircraftClassification {
    pub code: String,
    pub name: String,
    pub family: String,
}

/// Maps type codes to families through a prefix table checked for overlaps.
#[derive(Debug, Clone)]
pub struct AircraftClassifier {
    prefixes: HashMap<String, String>,
}

impl AircraftClassifier {
    /// Builds the classifier from the built-in family table.
    pub fn new() -> Result<Self> {
        Self::with_families(FAMILIES.iter().map(|(family, codes)| (*family, codes.iter().copied())))
    }

    /// Builds a classifier from `(family, prefixes)` pairs.
    ///
    /// Fails with [`Error::OverlappingPrefix`] if a prefix is listed under
    /// two different families.
    pub fn with_families<'a, F, P>(families: F) -> Result<Self>
    where
        F: IntoIterator<Item = (&'a str, P)>,
        P: IntoIterator<Item = &'a str>,
    {
        let mut prefixes: HashMap<String, String> = HashMap::new();
        for (family, codes) in families {
            for prefix in codes {
                match prefixes.get(prefix) {
                    Some(existing) if existing != family => {
                        return Err(Error::OverlappingPrefix {
                            prefix: prefix.to_string(),
                            first: existing.clone(),
                            second: family.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        prefixes.insert(prefix.to_string(), family.to_string());
                    }
                }
            }
        }
        debug!(prefixes = prefixes.len(), "Aircraft family table loaded");
        Ok(Self { prefixes })
    }

    /// Family of a type code, looked up by its first three characters.
    pub fn family_of(&self, code: &str) -> &str {
        let key: String = code.chars().take(3).collect();
        self.prefixes
            .get(&key)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_FAMILY)
    }

    /// Distinct `(code, name, family)` triples for the records that carry an aircraft.
    ///
    /// Records whose aircraft object is null are skipped.
    pub fn classify(&self, records: &[RawFlightRecord]) -> Result<BTreeSet<AircraftClassification>> {
        let mut seen = BTreeSet::new();
        for record in records {
            if !record.has_aircraft()? {
                continue;
            }
            let code = record.aircraft_code()?.unwrap_or_default();
            let name = record.aircraft_name()?.unwrap_or_default();
            seen.insert(AircraftClassification {
                code: code.to_string(),
                name: name.to_string(),
                family: self.family_of(code).to_string(),
            });
        }
        Ok(seen)
    }
}
