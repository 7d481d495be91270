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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, the playable
//! [`Track`] and the user-toggled [`PlaybackMode`], along with the play
//! [`history`] that records what has been selected for playback.

pub(crate) mod history;

use serde::{Deserialize, Serialize};

const THUMBNAIL_BASE_URL: &str = "https://img.youtube.com/vi";
const WATCH_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Artwork variants published by the video host for every video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ArtworkSize {
    /// 320x180, used in the now-playing panel.
    Medium,
    /// 480x360, used for media-session metadata.
    High,
}

impl ArtworkSize {
    fn file_name(self) -> &'static str {
        match self {
            ArtworkSize::Medium => "mqdefault.jpg",
            ArtworkSize::High => "hqdefault.jpg",
        }
    }
}

/// A playable media item: an opaque engine video key and a display title.
///
/// Two tracks are equal when their identifiers are equal, regardless of
/// title.
#[derive(Clone, Debug, Eq, Serialize, Deserialize)]
pub(crate) struct Track {
    #[serde(rename = "videoId")]
    video_id: String,
    title: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.video_id == other.video_id
    }
}

impl Track {
    pub(crate) fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
        }
    }

    pub(crate) fn video_id(&self) -> &str {
        &self.video_id
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    /// The thumbnail published for this track's video.
    pub(crate) fn artwork_url(&self, size: ArtworkSize) -> String {
        format!("{}/{}/{}", THUMBNAIL_BASE_URL, self.video_id, size.file_name())
    }

    /// The URL handed to the playback engine to load this track.
    pub(crate) fn watch_url(&self) -> String {
        format!("{}{}", WATCH_BASE_URL, self.video_id)
    }
}

/// Governs automatic continuation after a track ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    /// The mode selected by the next press of the repeat control.
    pub(crate) fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PlaybackMode {
    pub(crate) shuffle: bool,
    pub(crate) repeat: RepeatMode,
}
