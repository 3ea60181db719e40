//! Trait and types for requesting schedule pages from a provider.

use crate::error::Result;
use crate::schedule::Direction;

/// Parameters of a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub airport: String,
    pub direction: Direction,
    /// Window start in Unix seconds.
    pub timestamp: i64,
    /// 1-based page index.
    pub page: u32,
    pub limit: u32,
}

/// Abstraction over the schedule provider (e.g., FlightRadar24).
///
/// Implementations return the raw page payload; the fetcher owns the
/// interpretation of its structure.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn request_page(&self, request: &PageRequest) -> Result<serde_json::Value>;
}
