//! Output directory handling

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Make sure the output root exists and is a directory, creating it on
/// first run.
///
/// # Errors
///
/// Returns [`Error::Output`] if the path exists but is not a directory,
/// or if it cannot be inspected or created.
pub async fn ensure_root(path: &Path) -> Result<()> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            debug!("Using output directory {}", path.display());
            Ok(())
        }
        Ok(_) => Err(Error::Output(format!(
            "{} exists but is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("First run, creating the directory {}", path.display());
            fs::create_dir_all(path).await.map_err(|e| {
                Error::Output(format!("Cannot create {}: {e}", path.display()))
            })
        }
        Err(e) => Err(Error::Output(format!(
            "Cannot access {}: {e}",
            path.display()
        ))),
    }
}

/// Create `root/folder` and every missing parent. Does nothing if the
/// directory already exists.
///
/// # Errors
///
/// Returns [`Error::Output`] if the directory cannot be created.
pub async fn ensure_subfolder(root: &Path, folder: &str) -> Result<PathBuf> {
    let dir = root.join(folder);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::Output(format!("Cannot create {}: {e}", dir.display())))?;
    Ok(dir)
}
