//! Multi-image upload accumulation.
//!
//! Uploads may run concurrently; each completed upload is appended in
//! completion order, not selection order. The resulting list can then be
//! reordered or pruned before the chart is submitted.

use std::collections::HashSet;

use tracing::{debug, warn};

/// Identifies one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

#[derive(Debug, Default)]
pub struct UploadSession {
    next_ticket: u64,
    in_flight: HashSet<UploadTicket>,
    image_urls: Vec<String>,
    last_error: Option<String>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new upload and clear any previous error.
    pub fn begin_upload(&mut self) -> UploadTicket {
        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket);
        self.last_error = None;
        ticket
    }

    /// Record the hosted URL of a finished upload.
    ///
    /// Returns `false` for unknown or already resolved tickets, including
    /// tickets issued before the last [`reset`](Self::reset).
    pub fn complete_upload(&mut self, ticket: UploadTicket, url: impl Into<String>) -> bool {
        if !self.in_flight.remove(&ticket) {
            return false;
        }
        let url = url.into();
        debug!(subsystem = "client", component = "upload", url = %url, "Upload complete");
        self.image_urls.push(url);
        true
    }

    pub fn fail_upload(&mut self, ticket: UploadTicket, message: impl Into<String>) -> bool {
        if !self.in_flight.remove(&ticket) {
            return false;
        }
        let message = message.into();
        warn!(subsystem = "client", component = "upload", error = %message, "Upload failed");
        self.last_error = Some(message);
        true
    }

    /// Move the image at `from` to position `to`, shifting the images in
    /// between. Out-of-range indices leave the list untouched.
    pub fn move_image(&mut self, from: usize, to: usize) -> bool {
        let len = self.image_urls.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let url = self.image_urls.remove(from);
            self.image_urls.insert(to, url);
        }
        true
    }

    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.image_urls.len()).then(|| self.image_urls.remove(index))
    }

    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_uploading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Forget all images and pending uploads.
    pub fn reset(&mut self) {
        self.in_flight.clear();
        self.image_urls.clear();
        self.last_error = None;
    }
}
