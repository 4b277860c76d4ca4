use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// A fully rendered output file waiting to be written
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }
}

/// Write every file, overwriting existing ones.
///
/// All contents are staged next to their targets first and only renamed into
/// place once every staged write succeeded, so a failed run leaves the
/// previous outputs untouched.
pub fn commit_outputs(files: &[RenderedFile]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &RenderedFile)> = Vec::with_capacity(files.len());

    for file in files {
        let staging = staging_path(&file.path);
        if let Err(err) = std::fs::write(&staging, &file.bytes) {
            discard(&staged);
            let _ = std::fs::remove_file(&staging);
            return Err(err.into());
        }
        staged.push((staging, file));
    }

    for (staging, file) in &staged {
        debug!("Writing {:?} ({} bytes)", file.path, file.bytes.len());
        std::fs::rename(staging, &file.path)?;
    }

    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

fn discard(staged: &[(PathBuf, &RenderedFile)]) {
    for (staging, _) in staged {
        if let Err(err) = std::fs::remove_file(staging) {
            warn!("Failed to remove staged file {:?}: {}", staging, err);
        }
    }
}
