//! Writing attachments below the output directory

use crate::error::{Error, Result};
use crate::message::ParsedMail;
use crate::output;
use crate::sanitize::folder_for_subject;
use std::path::{Path, PathBuf};
use tracing::info;

/// Stores the attachments of each mail in a folder named after its
/// subject.
#[derive(Debug, Clone)]
pub struct AttachmentWriter {
    root: PathBuf,
}

impl AttachmentWriter {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write every attachment of `mail` to
    /// `<root>/<folder for subject>/<file name>` and return the paths
    /// written.
    ///
    /// Mails with a missing or empty subject, or without attachments, are
    /// skipped and nothing is created. Attachments sharing a file name overwrite
    /// each other; the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if the folder cannot be created or a
    /// file cannot be written.
    pub async fn write(&self, mail: &ParsedMail) -> Result<Vec<PathBuf>> {
        let Some(subject) = mail.subject.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(Vec::new());
        };
        if mail.attachments.is_empty() {
            return Ok(Vec::new());
        }

        let folder = folder_for_subject(subject);
        let dir = output::ensure_subfolder(&self.root, &folder).await?;

        let mut written = Vec::with_capacity(mail.attachments.len());
        for attachment in &mail.attachments {
            let path = dir.join(attachment.file_name());
            tokio::fs::write(&path, &attachment.content)
                .await
                .map_err(|e| Error::Output(format!("Cannot write {}: {e}", path.display())))?;

            info!(
                "Attachment saved to {} ({})",
                path.display(),
                attachment.content_type
            );
            written.push(path);
        }

        Ok(written)
    }
}
