//! Attachment Manager
//!
//! Validates and persists uploaded proof-of-payment files. Stored files get
//! a random name so public paths never carry the client's filename. Serving
//! the bytes back is left to the static file route.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

use crate::common::logging::log_attachment_event;

/// Content types accepted as proof of payment
pub const ALLOWED_CONTENT_TYPES: [&str; 6] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/pjpeg",
    "image/webp",
    "application/pdf",
];

/// Extension used when the upload has none we can keep
pub const DEFAULT_EXTENSION: &str = "bin";

const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores attachments under a directory exposed at a public prefix
#[derive(Debug, Clone)]
pub struct AttachmentManager {
    upload_dir: PathBuf,
    public_prefix: String,
}

impl AttachmentManager {
    /// Create a manager writing into `upload_dir`, creating it if needed
    pub fn new<P: Into<PathBuf>>(
        upload_dir: P,
        public_prefix: impl Into<String>,
    ) -> Result<Self, AttachmentError> {
        let upload_dir = upload_dir.into();
        std::fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            upload_dir,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Check a content type against the allow-list
    pub fn is_allowed(content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        ALLOWED_CONTENT_TYPES.contains(&essence.as_str())
    }

    /// Validate and write an upload, returning its public reference path
    ///
    /// The content is written to a temporary file in the upload directory
    /// and renamed into place, so the final path never holds a partial file.
    pub fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, AttachmentError> {
        if !Self::is_allowed(content_type) {
            log_attachment_event(
                "attachment_rejected",
                filename,
                content_type,
                bytes.len(),
                false,
                Some("unsupported content type"),
            );
            return Err(AttachmentError::UnsupportedType(content_type.to_string()));
        }

        let stored_name = format!("{}.{}", Uuid::new_v4().simple(), storage_extension(filename));
        let final_path = self.upload_dir.join(&stored_name);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.upload_dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&final_path).map_err(|e| AttachmentError::Io(e.error))?;

        log_attachment_event(
            "attachment_stored",
            &stored_name,
            content_type,
            bytes.len(),
            true,
            None,
        );

        Ok(format!("{}/{}", self.public_prefix, stored_name))
    }
}

/// Extension of the original filename, if it is a plain short token
fn storage_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
