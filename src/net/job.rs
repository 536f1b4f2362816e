// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Background job status polling.
//!
//! A [`JobWatcher`] polls the backend on a fixed interval from a worker
//! thread and delivers every status over an mpsc channel. Polling stops
//! on the first terminal status or when the watcher is cancelled; drop
//! cancels it, so a watcher never outlives the screen that created it.

use crate::models::project::JobStatus;
use crate::net::api::ApiClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Default polling interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Either a status update or the error that ended a poll attempt.
pub type PollResult = Result<JobStatus, String>;

/// Handle to a polling worker thread.
pub struct JobWatcher {
    job_id: String,
    receiver: Receiver<PollResult>,
    cancelled: Arc<AtomicBool>,
}

impl JobWatcher {
    /// Start polling the given job. `api` is moved onto the worker.
    pub fn spawn(api: ApiClient, job_id: String, interval: Duration) -> Self {
        let (sender, receiver) = channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let worker_cancelled = Arc::clone(&cancelled);
        let worker_job_id = job_id.clone();
        std::thread::spawn(move || {
            log::info!("Watching job {}", worker_job_id);
            loop {
                if worker_cancelled.load(Ordering::Relaxed) {
                    break;
                }

                let result = api
                    .job_status(&worker_job_id)
                    .map_err(|e| e.to_string());
                let terminal = matches!(&result, Ok(status) if status.status.is_terminal());

                // Receiver dropped means the consumer is gone.
                if sender.send(result).is_err() {
                    break;
                }
                if terminal {
                    log::info!("Job {} reached a terminal state", worker_job_id);
                    break;
                }

                std::thread::sleep(interval);
            }
        });

        Self {
            job_id,
            receiver,
            cancelled,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Non-blocking read of the next poll result, if one arrived.
    pub fn try_recv(&self) -> Option<PollResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Stop the worker after its current sleep.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Drop for JobWatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_sets_flag() {
        let watcher = JobWatcher::spawn(
            ApiClient::new("http://127.0.0.1:1"),
            "job".into(),
            Duration::from_millis(10),
        );
        watcher.cancel();
        assert!(watcher.cancelled.load(Ordering::Relaxed));
    }

    #[test]
    fn test_unreachable_backend_reports_error() {
        // Port 1 is never listening; the first poll should deliver an Err.
        let watcher = JobWatcher::spawn(
            ApiClient::new("http://127.0.0.1:1"),
            "job".into(),
            Duration::from_millis(10),
        );
        let mut result = None;
        for _ in 0..200 {
            if let Some(r) = watcher.try_recv() {
                result = Some(r);
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(matches!(result, Some(Err(_))));
    }
}
