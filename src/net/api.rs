// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering backend HTTP client.
//!
//! One multipart upload plus a status/result pair. All calls are single
//! best-effort attempts with no retry; failures surface to the caller as
//! errors. Blocking requests only, run from a worker thread by the app.

use crate::models::overlay::{Overlay, OverlayKind};
use crate::models::project::{JobStatus, UploadResponse};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "BUTTERCUT_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct UploadMetadata<'a> {
    overlays: &'a [Overlay],
}

/// Client for the upload/job endpoints.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    /// Base URL from `BUTTERCUT_API_URL`, falling back to localhost.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload the source video together with the overlay metadata.
    ///
    /// Overlays must already be rescaled to source-video-pixel space.
    /// Image/video overlays referencing local files are attached as
    /// `overlay_file_{index}` parts, where the index is the overlay's
    /// position in the list.
    pub fn upload(&self, video_path: &Path, overlays: &[Overlay]) -> Result<UploadResponse> {
        let metadata = serde_json::to_string(&UploadMetadata { overlays })?;

        let mut form = reqwest::blocking::multipart::Form::new()
            .file("video", video_path)
            .with_context(|| format!("reading video {}", video_path.display()))?
            .text("metadata", metadata);

        for (index, overlay) in overlays.iter().enumerate() {
            if !matches!(overlay.kind, OverlayKind::Image | OverlayKind::Video) {
                continue;
            }
            let path = local_path(&overlay.content);
            if !path.exists() {
                log::warn!("Overlay file missing, skipping: {}", path.display());
                continue;
            }
            form = form
                .file(format!("overlay_file_{index}"), &path)
                .with_context(|| format!("reading overlay file {}", path.display()))?;
        }

        let response = self
            .client
            .post(format!("{}/api/v1/upload", self.base_url))
            .multipart(form)
            .send()
            .context("upload request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(error_detail(response)));
        }
        Ok(response.json()?)
    }

    /// Fetch the processing status for a job.
    pub fn job_status(&self, job_id: &str) -> Result<JobStatus> {
        let response = self
            .client
            .get(format!("{}/api/v1/status/{}", self.base_url, job_id))
            .send()
            .context("status request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(error_detail(response)));
        }
        Ok(response.json()?)
    }

    /// Download URL for a finished job. Opened out-of-band, never parsed.
    pub fn result_url(&self, job_id: &str) -> String {
        format!("{}/api/v1/result/{}", self.base_url, job_id)
    }

    /// Remove a job from the backend. Returns whether the backend agreed.
    pub fn delete_job(&self, job_id: &str) -> Result<bool> {
        let response = self
            .client
            .delete(format!("{}/api/v1/job/{}", self.base_url, job_id))
            .send()
            .context("delete request failed")?;
        Ok(response.status().is_success())
    }
}

/// Extract the backend's `detail` message from an error body, falling
/// back to the HTTP status.
fn error_detail(response: reqwest::blocking::Response) -> String {
    let status = response.status();
    response
        .json::<serde_json::Value>()
        .ok()
        .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// Strip a `file://` scheme so picker URIs work as filesystem paths.
fn local_path(content: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(content.strip_prefix("file://").unwrap_or(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_trimmed() {
        let client = ApiClient::new("http://example.com/");
        assert_eq!(client.base_url(), "http://example.com");
    }

    #[test]
    fn test_result_url_shape() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(
            client.result_url("abc123"),
            "http://localhost:8000/api/v1/result/abc123"
        );
    }

    #[test]
    fn test_local_path_strips_scheme() {
        assert_eq!(
            local_path("file:///tmp/a.png"),
            std::path::PathBuf::from("/tmp/a.png")
        );
        assert_eq!(local_path("/tmp/b.png"), std::path::PathBuf::from("/tmp/b.png"));
    }

    #[test]
    fn test_metadata_wraps_overlays() {
        let overlays = vec![Overlay::new(
            crate::models::overlay::OverlayKind::Text,
            "hi",
            0.0,
            0.0,
            0.0,
            3.0,
        )];
        let json = serde_json::to_value(UploadMetadata { overlays: &overlays }).unwrap();
        assert!(json["overlays"].is_array());
        assert_eq!(json["overlays"][0]["type"], "text");
    }
}
