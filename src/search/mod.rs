// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Track search.
//!
//! Searches either go through a search proxy answering
//! `GET /search?q=<text>` with a JSON array of `{videoId, title}` objects,
//! or fetch the video host's results page directly and extract the same
//! pairs from it (see [`scrape`]).
//!
//! A failed search is not an error for the caller: it is logged and yields
//! no results.

pub(crate) mod scrape;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{config::SearchConfig, model::Track};

pub(crate) const MAX_RESULTS: usize = 10;

const RESULTS_PAGE_URL: &str = "https://www.youtube.com/results?search_query=";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SearchBackend {
    #[default]
    Proxy,
    Direct,
}

pub(crate) struct SearchClient {
    client: Client,
    backend: SearchBackend,
    proxy_url: String,
    max_results: usize,
    results_page: scrape::ResultsPage,
}

impl SearchClient {
    pub(crate) fn new(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            backend: config.backend,
            proxy_url: config.proxy_url.trim_end_matches('/').to_string(),
            max_results: config.max_results.min(MAX_RESULTS),
            results_page: scrape::ResultsPage::new()?,
        })
    }

    /// Runs a search, returning at most the configured number of tracks.
    ///
    /// An empty query returns no results without making a request.
    pub(crate) fn search(&self, query: &str) -> Vec<Track> {
        let query = query.trim();
        if query.is_empty() {
            return vec![];
        }

        match self.fetch(query) {
            Ok(tracks) => {
                log::info!("Search for '{}' returned {} results", query, tracks.len());
                tracks
            }
            Err(e) => {
                log::warn!("Search for '{}' failed: {:#}", query, e);
                vec![]
            }
        }
    }

    fn fetch(&self, query: &str) -> Result<Vec<Track>> {
        let encoded = urlencoding::encode(query);

        match self.backend {
            SearchBackend::Proxy => {
                let url = format!("{}/search?q={}", self.proxy_url, encoded);
                let body = self.get(&url)?;
                parse_results(&body, self.max_results)
            }
            SearchBackend::Direct => {
                let url = format!("{}{}", RESULTS_PAGE_URL, encoded);
                let body = self.get(&url)?;
                Ok(self.results_page.extract(&body, self.max_results))
            }
        }
    }

    fn get(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);

        self.client
            .get(url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .context("Search request was rejected")?
            .text()
            .context("Failed to read search response")
    }
}

/// Parses a search proxy response body.
pub(crate) fn parse_results(body: &str, max_results: usize) -> Result<Vec<Track>> {
    let mut tracks: Vec<Track> =
        serde_json::from_str(body).context("Malformed search response")?;
    tracks.truncate(max_results);

    Ok(tracks)
}
