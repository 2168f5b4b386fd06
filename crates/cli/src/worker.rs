use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use hansa_core::audio::infrastructure::ffmpeg_normalizer::FfmpegNormalizer;
use hansa_core::pipeline::run_state::{RunOutcome, RunPhase};
use hansa_core::pipeline::transcribe_media_use_case::{PipelineError, TranscribeMediaUseCase};
use hansa_core::staging::staging_area::StagingArea;
use hansa_core::transcription::infrastructure::whisper_process_transcriber::WhisperProcessTranscriber;

/// Messages sent from the worker thread to the front end.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    Phase(RunPhase),
    Line(String),
    Finished(RunOutcome),
    Error(String),
    Cancelled,
}

/// Parameters for one transcription job.
pub struct TranscribeParams {
    pub input_path: PathBuf,
    pub staging: StagingArea,
}

/// Spawn a background transcription worker. Returns the message receiver
/// and the cancellation token.
pub fn spawn(params: TranscribeParams) -> (Receiver<WorkerMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    thread::spawn(move || match run_transcription(&tx, &cancelled_clone, params) {
        Ok(outcome) => {
            let _ = tx.send(WorkerMessage::Finished(outcome));
        }
        Err(e) => {
            if cancelled_clone.load(Ordering::Relaxed) {
                let _ = tx.send(WorkerMessage::Cancelled);
            } else {
                let _ = tx.send(WorkerMessage::Error(e.to_string()));
            }
        }
    });

    (rx, cancelled)
}

fn run_transcription(
    tx: &Sender<WorkerMessage>,
    cancelled: &Arc<AtomicBool>,
    params: TranscribeParams,
) -> Result<RunOutcome, PipelineError> {
    let tx_phase = tx.clone();
    let tx_line = tx.clone();

    let mut use_case = TranscribeMediaUseCase::new(
        params.staging,
        Box::new(FfmpegNormalizer::new()),
        Box::new(WhisperProcessTranscriber::new()),
        Some(Box::new(move |phase| {
            let _ = tx_phase.send(WorkerMessage::Phase(phase));
        })),
        Some(Box::new(move |line: &str| {
            let _ = tx_line.send(WorkerMessage::Line(line.to_string()));
        })),
    );

    use_case.execute(&params.input_path, cancelled)
}
