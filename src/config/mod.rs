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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    controller::{ControllerSettings, session::UnloadPolicy},
    model::history::DedupPolicy,
    navigation::WrapPolicy,
    search::{MAX_RESULTS, SearchBackend},
};

pub(crate) const CONFIG_NAME: &str = "tubedeck";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct SearchConfig {
    pub(crate) backend: SearchBackend,
    pub(crate) proxy_url: String,
    pub(crate) max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: SearchBackend::Proxy,
            proxy_url: "http://localhost:3000".to_string(),
            max_results: MAX_RESULTS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) search: SearchConfig,

    /// Volume applied once the engine is ready, 0 to 100.
    pub(crate) initial_volume: u32,
    /// Seek step as a fraction of the track duration.
    pub(crate) seek_step: f64,
    pub(crate) volume_step: i32,
    pub(crate) transport_interval_ms: u64,

    pub(crate) dedup_policy: DedupPolicy,
    pub(crate) wrap_policy: WrapPolicy,
    pub(crate) unload_policy: UnloadPolicy,

    /// Origin presented to the media host when loading tracks.
    pub(crate) origin: String,
    /// Open a video window instead of playing audio only.
    pub(crate) video: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            search: SearchConfig::default(),
            initial_volume: 50,
            seek_step: 0.05,
            volume_step: 5,
            transport_interval_ms: 1000,
            dedup_policy: DedupPolicy::default(),
            wrap_policy: WrapPolicy::default(),
            unload_policy: UnloadPolicy::default(),
            origin: "https://www.youtube.com".to_string(),
            video: false,
        }
    }
}

impl AppConfig {
    pub(crate) fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            dedup: self.dedup_policy,
            wrap: self.wrap_policy,
            unload: self.unload_policy,
            initial_volume: self.initial_volume,
            video: self.video,
        }
    }
}

pub(crate) fn load_config() -> AppConfig {
    match confy::load(CONFIG_NAME, None) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load configuration, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

/// The directory the configuration file lives in, if it can be determined.
pub(crate) fn config_dir() -> Option<PathBuf> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.initial_volume, 50);
        assert_eq!(config.transport_interval_ms, 1000);
        assert_eq!(config.search.max_results, 10);
        assert_eq!(config.search.backend, SearchBackend::Proxy);
        assert_eq!(config.dedup_policy, DedupPolicy::Current);
        assert_eq!(config.wrap_policy, WrapPolicy::RepeatAllOnly);
        assert_eq!(config.unload_policy, UnloadPolicy::WhilePlaying);
        assert!(!config.video);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"initial_volume": 80, "search": {"backend": "direct"}, "wrap_policy": "always"}"#,
        )
        .unwrap();

        assert_eq!(config.initial_volume, 80);
        assert_eq!(config.search.backend, SearchBackend::Direct);
        assert_eq!(config.search.proxy_url, "http://localhost:3000");
        assert_eq!(config.wrap_policy, WrapPolicy::Always);
        assert_eq!(config.seek_step, 0.05);
    }

    #[test]
    fn controller_settings_follow_config() {
        let config = AppConfig {
            initial_volume: 30,
            dedup_policy: DedupPolicy::Tail,
            unload_policy: UnloadPolicy::Never,
            ..AppConfig::default()
        };

        let settings = config.controller_settings();

        assert_eq!(settings.initial_volume, 30);
        assert_eq!(settings.dedup, DedupPolicy::Tail);
        assert_eq!(settings.unload, UnloadPolicy::Never);
    }
}
