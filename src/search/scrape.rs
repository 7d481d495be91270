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

//! Extraction of search results from the video host's results page.
//!
//! The page embeds its initial data as JSON. Video identifiers and titles
//! are collected independently, in page order, and paired up by position.

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Track;

const VIDEO_ID_PATTERN: &str = r#""videoId":"(.*?)""#;
const TITLE_PATTERN: &str = r#""title":\{"runs":\[\{"text":"(.*?)"\}"#;

const NO_TITLE: &str = "No Title";

/// Compiled patterns for picking results out of a results page.
pub(crate) struct ResultsPage {
    video_id: Regex,
    title: Regex,
}

impl ResultsPage {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            video_id: Regex::new(VIDEO_ID_PATTERN).context("Invalid video id pattern")?,
            title: Regex::new(TITLE_PATTERN).context("Invalid title pattern")?,
        })
    }

    /// Extracts up to `max_results` tracks from a results page.
    ///
    /// A track without a matching title is given a placeholder title.
    pub(crate) fn extract(&self, html: &str, max_results: usize) -> Vec<Track> {
        let titles: Vec<&str> = captures(&self.title, html).collect();

        captures(&self.video_id, html)
            .take(max_results)
            .enumerate()
            .map(|(i, video_id)| {
                let title = titles
                    .get(i)
                    .filter(|title| !title.is_empty())
                    .map(|title| unescape(title))
                    .unwrap_or_else(|| NO_TITLE.to_string());
                Track::new(video_id, title)
            })
            .collect()
    }
}

fn captures<'h>(pattern: &Regex, haystack: &'h str) -> impl Iterator<Item = &'h str> {
    pattern
        .captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Decodes JSON string escapes, keeping the raw text if it is not valid.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}
