use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::audio::domain::audio_normalizer::{AudioNormalizer, NormalizeError};
use crate::shared::constants::{FFMPEG_COMMAND, STAGED_CHANNELS, STAGED_CODEC, STAGED_SAMPLE_RATE};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Converts media to staged WAV by invoking the external `ffmpeg`
/// executable, buffering its output streams for diagnostics.
pub struct FfmpegNormalizer {
    command: PathBuf,
}

impl FfmpegNormalizer {
    pub fn new() -> Self {
        Self {
            command: PathBuf::from(FFMPEG_COMMAND),
        }
    }

    /// Override the conversion executable.
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    fn command_name(&self) -> String {
        self.command.display().to_string()
    }
}

impl Default for FfmpegNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioNormalizer for FfmpegNormalizer {
    fn normalize(
        &self,
        input: &Path,
        staged_wav: &Path,
        cancel: &AtomicBool,
    ) -> Result<(), NormalizeError> {
        log::info!(
            "converting {} to {} ch {} Hz {}",
            input.display(),
            STAGED_CHANNELS,
            STAGED_SAMPLE_RATE,
            STAGED_CODEC
        );

        let mut child = Command::new(&self.command)
            .arg("-i")
            .arg(input)
            .args(["-acodec", STAGED_CODEC])
            .arg("-ac")
            .arg(STAGED_CHANNELS.to_string())
            .arg("-ar")
            .arg(STAGED_SAMPLE_RATE.to_string())
            .arg("-y")
            .arg(staged_wav)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| NormalizeError::Launch {
                command: self.command_name(),
                source: e,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = loop {
            if cancel.load(Ordering::Relaxed) {
                kill_and_reap(&mut child);
                let _ = fs::remove_file(staged_wav);
                return Err(NormalizeError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    kill_and_reap(&mut child);
                    return Err(NormalizeError::Io {
                        command: self.command_name(),
                        source: e,
                    });
                }
            }
        };

        let captured_stdout = stdout.and_then(|h| h.join().ok()).unwrap_or_default();
        let captured_stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();

        if !status.success() {
            // Whatever ffmpeg managed to write is unusable downstream.
            let _ = fs::remove_file(staged_wav);
            let diagnostics = format!(
                "{}{}",
                String::from_utf8_lossy(&captured_stdout),
                String::from_utf8_lossy(&captured_stderr)
            );
            return Err(NormalizeError::Conversion {
                input: input.to_path_buf(),
                diagnostics,
            });
        }

        Ok(())
    }
}

fn drain(mut stream: impl Read + Send + 'static) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf);
        buf
    })
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
