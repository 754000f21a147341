//! Service layer for work that sits beside the repositories.

pub mod attachments;

pub use attachments::{
    file_key_from_url, AttachmentLifecycle, CleanupReport, DisabledAttachmentStore,
    UploadThingStore,
};
