//! Hosted attachment cleanup.
//!
//! Chart images live on an external upload service and are referenced by URL.
//! When a chart is deleted its images are removed from the host on a
//! best-effort basis: one attempt per file, failures logged and swallowed.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `UPLOADTHING_SECRET`: API key; cleanup is disabled when unset
//! - `UPLOADTHING_API_URL`: API base URL (default: https://api.uploadthing.com)
//! - `ATTACHMENT_TIMEOUT_SECS`: per-request timeout (default: 10)

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use journal_core::{AttachmentStore, Error, Result};

/// Derive the hosted file key from an image URL.
///
/// The key is the final non-empty path segment, with any query string or
/// fragment removed. Returns `None` when the URL has no path to take it from.
pub fn file_key_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let without_query = &url[..end];

    let path = match without_query.split_once("://") {
        Some((_, rest)) => &rest[rest.find('/')?..],
        None => without_query,
    };

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(String::from)
}

// =============================================================================
// STORES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: [&'a str; 1],
}

#[derive(Deserialize)]
struct DeleteFilesResponse {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

/// UploadThing REST client.
pub struct UploadThingStore {
    client: Client,
    api_url: String,
    secret: String,
}

impl UploadThingStore {
    /// Create a client for the given API base URL.
    pub fn new(
        api_url: impl Into<String>,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = api_url.into().trim_end_matches('/').to_string();
        info!(
            subsystem = "attachments",
            component = "uploadthing",
            api_url = %api_url,
            timeout_secs = timeout.as_secs(),
            "Attachment cleanup enabled"
        );

        Ok(Self {
            client,
            api_url,
            secret: secret.into(),
        })
    }
}

#[async_trait]
impl AttachmentStore for UploadThingStore {
    fn name(&self) -> &str {
        "uploadthing"
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/v6/deleteFiles", self.api_url))
            .header("x-uploadthing-api-key", &self.secret)
            .json(&DeleteFilesRequest { file_keys: [key] })
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Storage(format!(
                "UploadThing returned {}: {}",
                status, body
            )));
        }

        // Older API versions answer with an empty body.
        let body = response.bytes().await.unwrap_or_default();
        if let Ok(parsed) = serde_json::from_slice::<DeleteFilesResponse>(&body) {
            if !parsed.success {
                return Err(Error::Storage(format!(
                    "UploadThing refused to delete '{}'",
                    key
                )));
            }
        }
        Ok(())
    }
}

/// Stand-in used when no upload service credentials are configured.
pub struct DisabledAttachmentStore;

#[async_trait]
impl AttachmentStore for DisabledAttachmentStore {
    fn name(&self) -> &str {
        "disabled"
    }

    fn enabled(&self) -> bool {
        false
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        debug!(
            subsystem = "attachments",
            component = "disabled",
            file_key = %key,
            "Attachment cleanup disabled, file left in place"
        );
        Ok(())
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
    /// URLs with no derivable key, or every URL when cleanup is disabled.
    pub skipped: usize,
}

/// Deletes the hosted files of a removed chart.
#[derive(Clone)]
pub struct AttachmentLifecycle {
    store: Arc<dyn AttachmentStore>,
}

impl AttachmentLifecycle {
    pub fn new(store: Arc<dyn AttachmentStore>) -> Self {
        Self { store }
    }

    /// Lifecycle that never contacts a host.
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledAttachmentStore))
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Attempt to delete every image of `chart_id` once. Never fails.
    pub async fn cleanup(&self, chart_id: &str, image_urls: &[String]) -> CleanupReport {
        let start = Instant::now();
        let mut report = CleanupReport::default();

        if !self.store.enabled() {
            report.skipped = image_urls.len();
            debug!(
                subsystem = "attachments",
                component = "lifecycle",
                op = "cleanup",
                chart_id = %chart_id,
                skipped_count = report.skipped,
                "Attachment cleanup skipped"
            );
            return report;
        }

        for url in image_urls {
            let Some(key) = file_key_from_url(url) else {
                warn!(
                    subsystem = "attachments",
                    component = "lifecycle",
                    chart_id = %chart_id,
                    url = %url,
                    "No file key in image URL, skipping"
                );
                report.skipped += 1;
                continue;
            };

            match self.store.delete_file(&key).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    warn!(
                        subsystem = "attachments",
                        component = "lifecycle",
                        op = "delete_file",
                        chart_id = %chart_id,
                        file_key = %key,
                        error = %e,
                        "Attachment deletion failed, file orphaned"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            subsystem = "attachments",
            component = "lifecycle",
            op = "cleanup",
            chart_id = %chart_id,
            store = self.store.name(),
            deleted_count = report.deleted,
            failed_count = report.failed,
            skipped_count = report.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Attachment cleanup finished"
        );
        report
    }
}
