use std::fs;
use std::io;
use std::path::Path;

/// Reads the plain-text transcript the external transcriber leaves beside
/// the staged WAV.
pub struct TranscriptLoader;

impl TranscriptLoader {
    /// Read the transcript at `transcript_path` in full. Returns
    /// `Ok(None)` when no transcript exists; absence is an expected
    /// outcome, not an error.
    pub fn load(&self, transcript_path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(transcript_path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
