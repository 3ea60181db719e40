use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::fetch::{BasicClient, HttpClient, fetch_json};
use crate::services::page_source::{PageRequest, PageSource};

/// [`PageSource`] backed by the FlightRadar24 airport schedule endpoint.
pub struct FlightRadarSource<C> {
    client: C,
    base_url: String,
    dump_dir: Option<PathBuf>,
}

impl FlightRadarSource<BasicClient> {
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(BasicClient::new(config)?, &config.base_url))
    }
}

impl<C: HttpClient> FlightRadarSource<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dump_dir: None,
        }
    }

    /// Writes every received page, pretty-printed, under `dir`.
    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    pub fn page_url(&self, request: &PageRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/common/v1/airport.json", self.base_url))
            .map_err(|e| Error::Transport(e.into()))?;
        url.query_pairs_mut()
            .append_pair("code", &request.airport)
            .append_pair("plugin[]", "schedule")
            .append_pair("plugin-setting[schedule][mode]", request.direction.mode())
            .append_pair("plugin-setting[schedule][timestamp]", &request.timestamp.to_string())
            .append_pair("limit", &request.limit.to_string())
            .append_pair("page", &request.page.to_string());
        Ok(url)
    }

    fn dump_page(&self, request: &PageRequest, payload: &Value) {
        let Some(dir) = &self.dump_dir else {
            return;
        };
        let path = dir.join(format!(
            "{}_{}_page{}.json",
            request.airport,
            request.direction.mode(),
            request.page
        ));
        let written = std::fs::create_dir_all(dir)
            .and_then(|_| {
                serde_json::to_string_pretty(payload)
                    .map_err(std::io::Error::other)
            })
            .and_then(|body| std::fs::write(&path, body));
        match written {
            Ok(()) => debug!(path = %path.display(), "Raw page written"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write raw page"),
        }
    }
}

#[async_trait]
impl<C: HttpClient> PageSource for FlightRadarSource<C> {
    async fn request_page(&self, request: &PageRequest) -> Result<Value> {
        let url = self.page_url(request)?;
        let payload = fetch_json(&self.client, url).await?;
        self.dump_page(request, &payload);
        Ok(payload)
    }
}
