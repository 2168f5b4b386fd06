use std::path::PathBuf;

/// Observable phases of a transcription run.
///
/// A run walks `Idle -> Staging -> Converting -> Transcribing -> Loaded`;
/// any failure ends it in `Failed`. A fresh input always restarts from
/// `Idle`, discarding the previous run's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Staging,
    Converting,
    Transcribing,
    Loaded,
    Failed,
}

/// Final state of a run that reached `Loaded`.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub input: PathBuf,
    pub staged_wav: PathBuf,
    /// Console lines captured from the transcriber, in arrival order.
    pub console_lines: Vec<String>,
    /// `None` when the transcriber exited cleanly but produced no
    /// transcript file.
    pub transcript: Option<String>,
}
