//! Files attached to REST 1.0 writes.

use std::path::Path;

use crate::error::RtError;

/// A file to upload with a create, update, reply or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown in RT.
    pub name: String,

    /// File contents.
    pub content: Vec<u8>,

    /// MIME type, if known.
    pub mime: Option<String>,
}

impl Attachment {
    /// Creates an attachment from in-memory bytes.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime: None,
        }
    }

    /// Sets the MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Reads an attachment from disk, naming it after the file.
    ///
    /// # Errors
    ///
    /// Returns `RtError::Io` if the file cannot be read and
    /// `RtError::Validation` if the path has no file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, RtError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RtError::validation(format!("attachment path has no file name: {}", path.display()))
            })?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Ok(Self::new(name, content))
    }
}
