use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::domain::audio_normalizer::{AudioNormalizer, NormalizeError};
use crate::pipeline::run_state::{RunOutcome, RunPhase};
use crate::staging::staging_area::StagingArea;
use crate::transcription::domain::transcriber::{TranscribeError, Transcriber, TranscriberExit};
use crate::transcription::domain::transcript_loader::TranscriptLoader;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("another transcription run is already in progress")]
    RunInProgress,
    #[error("failed to create staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
    /// A transcript file may still exist (possibly stale from an earlier
    /// run); it is not trusted after an unsuccessful exit.
    #[error("transcriber failed with {status}")]
    TranscriberFailed { status: TranscriberExit },
    #[error("failed to read transcript {path}: {source}")]
    TranscriptRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Phase observer: called on every state transition.
pub type PhaseFn = Box<dyn Fn(RunPhase) + Send>;
/// Line observer: called for each transcriber console line, in order.
pub type LineFn = Box<dyn Fn(&str) + Send>;

/// Sequences one transcription run: ensure the staging area, normalize the
/// input into it, stream the external transcriber, then load the
/// transcript it left behind.
///
/// Only one run may be in flight; a second input arriving mid-run is
/// rejected with [`PipelineError::RunInProgress`] rather than queued.
pub struct TranscribeMediaUseCase {
    staging: StagingArea,
    normalizer: Box<dyn AudioNormalizer>,
    transcriber: Box<dyn Transcriber>,
    loader: TranscriptLoader,
    on_phase: Option<PhaseFn>,
    on_line: Option<LineFn>,
    busy: Arc<AtomicBool>,
    phase: RunPhase,
}

impl TranscribeMediaUseCase {
    pub fn new(
        staging: StagingArea,
        normalizer: Box<dyn AudioNormalizer>,
        transcriber: Box<dyn Transcriber>,
        on_phase: Option<PhaseFn>,
        on_line: Option<LineFn>,
    ) -> Self {
        Self {
            staging,
            normalizer,
            transcriber,
            loader: TranscriptLoader,
            on_phase,
            on_line,
            busy: Arc::new(AtomicBool::new(false)),
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Shared in-flight flag. Front ends clone it to gate new submissions
    /// while a run is live.
    pub fn busy_flag(&self) -> Arc<AtomicBool> {
        self.busy.clone()
    }

    /// Run the full pipeline for `input`, blocking until the transcript is
    /// loaded or a step fails. Errors propagate verbatim, external-tool
    /// diagnostics included; nothing is retried.
    pub fn execute(
        &mut self,
        input: &Path,
        cancel: &AtomicBool,
    ) -> Result<RunOutcome, PipelineError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            // Leave the active run's state untouched.
            return Err(PipelineError::RunInProgress);
        }
        let result = self.run(input, cancel);
        if result.is_err() {
            self.set_phase(RunPhase::Failed);
        }
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    fn run(&mut self, input: &Path, cancel: &AtomicBool) -> Result<RunOutcome, PipelineError> {
        // A fresh input discards whatever the previous run left behind.
        self.set_phase(RunPhase::Idle);

        self.set_phase(RunPhase::Staging);
        self.staging.ensure().map_err(|e| PipelineError::Staging {
            path: self.staging.root().to_path_buf(),
            source: e,
        })?;
        let staged_wav = self.staging.staged_wav_path(input);

        self.set_phase(RunPhase::Converting);
        self.normalizer.normalize(input, &staged_wav, cancel)?;

        self.set_phase(RunPhase::Transcribing);
        let mut console_lines = Vec::new();
        let on_line = self.on_line.as_deref();
        let exit = self.transcriber.transcribe(
            &staged_wav,
            &mut |line| {
                console_lines.push(line.to_string());
                if let Some(cb) = on_line {
                    cb(line);
                }
            },
            cancel,
        )?;
        if !exit.success() {
            return Err(PipelineError::TranscriberFailed { status: exit });
        }

        let transcript_path = self.staging.transcript_path(&staged_wav);
        let transcript =
            self.loader
                .load(&transcript_path)
                .map_err(|e| PipelineError::TranscriptRead {
                    path: transcript_path.clone(),
                    source: e,
                })?;
        if transcript.is_none() {
            log::warn!(
                "transcriber exited cleanly but left no transcript at {}",
                transcript_path.display()
            );
        }

        self.set_phase(RunPhase::Loaded);
        Ok(RunOutcome {
            input: input.to_path_buf(),
            staged_wav,
            console_lines,
            transcript,
        })
    }

    fn set_phase(&mut self, phase: RunPhase) {
        self.phase = phase;
        if let Some(cb) = &self.on_phase {
            cb(phase);
        }
    }
}
