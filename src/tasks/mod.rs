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

//! Background application task processing.
//!
//! This module implements the command pattern used to offload blocking work,
//! such as network searches, from the main UI thread. It provides a dedicated
//! worker loop that translates [`AppTask`] requests into operations and
//! broadcasts the results back to the application via [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are better suited
//! to events.

mod handlers;

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use anyhow::Result;

use crate::{config::AppConfig, events::AppEvent, search::SearchClient};

#[derive(Debug, PartialEq)]
pub(crate) enum AppTask {
    Search(String),
}

/// Spawns a background thread to process application tasks.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
///
/// # Errors
///
/// Returns an error if the search client cannot be created.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let search = SearchClient::new(&config.search)?;

    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let ctx = TaskContext {
                event_tx: &event_tx,
                search: &search,
            };

            if let Err(e) = handle_task(task, &ctx) {
                log::error!("Task failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
        log::debug!("Task channel closed, stopping worker");
    });

    Ok(())
}

/// Bundles shared resources required by task handlers.
struct TaskContext<'a> {
    event_tx: &'a Sender<AppEvent>,
    search: &'a SearchClient,
}

fn handle_task(task: AppTask, ctx: &TaskContext) -> Result<()> {
    log::debug!("Task: {:?}", task);

    match task {
        AppTask::Search(query) => handlers::search(ctx, query),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;

    #[test]
    fn empty_search_reports_no_results() {
        let (task_tx, task_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        spawn_task_worker(&AppConfig::default(), task_rx, event_tx).unwrap();
        task_tx.send(AppTask::Search("  ".to_string())).unwrap();

        match event_rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::SearchResultsReady(query, tracks) => {
                assert_eq!(query, "  ");
                assert!(tracks.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
