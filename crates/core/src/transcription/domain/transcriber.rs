use std::fmt;
use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use thiserror::Error;

/// How the external transcriber process terminated. `code` is `None` when
/// the process was killed by a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscriberExit {
    pub code: Option<i32>,
}

impl TranscriberExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for TranscriberExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o error while streaming transcriber output: {0}")]
    Stream(#[source] io::Error),
    #[error("transcription cancelled")]
    Cancelled,
}

/// Domain interface for running the external speech-to-text executable
/// over a staged WAV.
///
/// Implementations invoke `on_line` synchronously for every line of the
/// process's combined stdout/stderr, in arrival order, and block until the
/// process terminates. Exit status is reported, not interpreted; writing
/// the transcript file is a side effect of the external process that the
/// transcriber does not verify.
pub trait Transcriber: Send {
    fn transcribe(
        &self,
        staged_wav: &Path,
        on_line: &mut dyn FnMut(&str),
        cancel: &AtomicBool,
    ) -> Result<TranscriberExit, TranscribeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_success_only_for_zero() {
        assert!(TranscriberExit { code: Some(0) }.success());
        assert!(!TranscriberExit { code: Some(1) }.success());
        assert!(!TranscriberExit { code: None }.success());
    }

    #[test]
    fn test_exit_display() {
        assert_eq!(TranscriberExit { code: Some(3) }.to_string(), "exit code 3");
        assert_eq!(
            TranscriberExit { code: None }.to_string(),
            "termination by signal"
        );
    }
}
