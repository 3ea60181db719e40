mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{Error, Result};
use tracing::debug;

/// GETs `url` and parses the body as JSON.
///
/// Non-success statuses are transport errors; a body that is not JSON is a
/// malformed response.
pub async fn fetch_json<C: HttpClient + ?Sized>(
    client: &C,
    url: reqwest::Url,
) -> Result<serde_json::Value> {
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response body received");

    serde_json::from_slice(&bytes).map_err(|_| Error::malformed_response("<body>"))
}
