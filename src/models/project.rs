// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Project persistence records and backend wire types.
//!
//! This module defines the saved-project record plus the small transient
//! structures exchanged with the rendering backend and the toast system.

use super::overlay::Overlay;
use serde::{Deserialize, Serialize};

/// A saved editing project. Persisted as part of the project list;
/// last write wins, no conflict resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoProject {
    pub id: String,
    pub name: String,
    #[serde(rename = "videoUri")]
    pub video_uri: String,
    #[serde(rename = "videoDuration")]
    pub video_duration: f64,
    pub overlays: Vec<Overlay>,
    /// Unix milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    #[serde(rename = "updatedAt")]
    pub updated_at: u64,
    #[serde(rename = "thumbnailUri", skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_uri: Option<String>,
}

impl VideoProject {
    /// Create a new project record for the given video.
    pub fn new(name: String, video_uri: String, video_duration: f64) -> Self {
        let now = unix_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            video_uri,
            video_duration,
            overlays: Vec::new(),
            created_at: now,
            updated_at: now,
            thumbnail_uri: None,
        }
    }
}

/// Current wall-clock time in unix milliseconds.
pub fn unix_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Processing state reported by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// Terminal states stop the status poller.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Job status payload from `GET /api/v1/status/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
    /// 0-100.
    pub progress: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Response payload from `POST /api/v1/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub message: String,
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient user-facing notification.
#[derive(Debug, Clone)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    /// Seconds before auto-dismissal.
    pub duration: f64,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, message: impl Into<String>, duration: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_job_status_deserializes_backend_payload() {
        let json = r#"{
            "job_id": "abc",
            "status": "processing",
            "progress": 42.0,
            "message": "compositing"
        }"#;
        let status: JobStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, JobState::Processing);
        assert_eq!(status.progress, 42.0);
        assert!(status.created_at.is_none());
    }

    #[test]
    fn test_new_project_timestamps() {
        let project = VideoProject::new("demo".into(), "file:///v.mp4".into(), 60.0);
        assert_eq!(project.created_at, project.updated_at);
        assert!(project.overlays.is_empty());
    }
}
