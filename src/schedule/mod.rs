//! Airport schedule retrieval and normalization.
//!
//! [`ScheduleFetcher`] walks the provider's pages for one direction and
//! returns raw [`RawFlightRecord`]s; [`normalize`] projects them into
//! [`NormalizedFlight`]s limited to the requested day.

mod fetcher;
mod normalize;
mod page;
mod record;
mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::ScheduleFetcher;
pub use normalize::{NormalizedFlight, normalize, project};
pub use page::Page;
pub use record::RawFlightRecord;
pub use window::{Direction, ScheduleWindow, next_day_start, parse_window_start};
