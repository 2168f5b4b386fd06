use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::shared::constants::{STAGING_DIR_NAME, TRANSCRIPT_SUFFIX};

/// Handle to the process-scoped staging directory holding converted audio
/// and the transcripts written beside it.
///
/// The handle is cheap to clone; ownership of cleanup belongs to the
/// [`StagingGuard`] the front end holds for the process lifetime.
#[derive(Clone, Debug)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The conventional staging area: a hidden directory in the process
    /// working directory.
    pub fn in_working_dir() -> Self {
        Self::new(STAGING_DIR_NAME)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the staging directory. Idempotent: succeeds if it already
    /// exists.
    pub fn ensure(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    /// Recursively remove the staging directory and everything staged in
    /// it. Succeeds if the directory is already absent.
    pub fn teardown(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Where the normalized WAV for `input` is staged: the input's base
    /// name (directory and final extension stripped) plus `.wav`.
    ///
    /// The name is a deterministic function of the input path, so two
    /// inputs sharing a base name overwrite each other's artifacts.
    pub fn staged_wav_path(&self, input: &Path) -> PathBuf {
        let mut name = input
            .file_stem()
            .unwrap_or_else(|| input.as_os_str())
            .to_os_string();
        name.push(".wav");
        self.root.join(name)
    }

    /// Where the transcriber leaves its plain-text output for a staged WAV:
    /// the WAV path with the transcript suffix appended.
    pub fn transcript_path(&self, staged_wav: &Path) -> PathBuf {
        let mut name = staged_wav.as_os_str().to_os_string();
        name.push(TRANSCRIPT_SUFFIX);
        PathBuf::from(name)
    }

    /// RAII cleanup for the whole area. Hold the guard for the process
    /// lifetime so teardown runs on success, failure, and unwind alike.
    pub fn cleanup_guard(&self) -> StagingGuard {
        StagingGuard {
            area: self.clone(),
        }
    }
}

/// Removes the staging directory when dropped.
pub struct StagingGuard {
    area: StagingArea,
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if let Err(e) = self.area.teardown() {
            log::warn!(
                "failed to remove staging directory {}: {e}",
                self.area.root().display()
            );
        }
    }
}
