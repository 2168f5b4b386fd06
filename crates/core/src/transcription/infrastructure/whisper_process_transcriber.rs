use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};

use crate::shared::constants::{
    TRANSCRIBER_COMMAND, TRANSCRIBER_LANGUAGE, TRANSCRIBER_MODEL_PATH, TRANSCRIBER_SPEED,
    TRANSCRIBER_THREADS,
};
use crate::transcription::domain::transcriber::{TranscribeError, Transcriber, TranscriberExit};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the external whisper.cpp-style executable over a staged WAV with
/// its fixed argument set, streaming combined stdout/stderr line-by-line.
///
/// One reader thread per stream feeds an unbounded channel; the calling
/// thread drains it, so lines reach the listener in arrival order while
/// the cancellation token is honored between messages.
pub struct WhisperProcessTranscriber {
    executable: PathBuf,
    model: PathBuf,
}

impl WhisperProcessTranscriber {
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from(TRANSCRIBER_COMMAND),
            model: PathBuf::from(TRANSCRIBER_MODEL_PATH),
        }
    }

    /// Override the transcriber executable.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Override the model file passed to the executable.
    pub fn with_model(mut self, model: impl Into<PathBuf>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for WhisperProcessTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber for WhisperProcessTranscriber {
    fn transcribe(
        &self,
        staged_wav: &Path,
        on_line: &mut dyn FnMut(&str),
        cancel: &AtomicBool,
    ) -> Result<TranscriberExit, TranscribeError> {
        log::info!("transcribing {}", staged_wav.display());

        let mut child = Command::new(&self.executable)
            .arg("-t")
            .arg(TRANSCRIBER_THREADS.to_string())
            .arg("-spd")
            .arg(TRANSCRIBER_SPEED.to_string())
            .args(["-l", TRANSCRIBER_LANGUAGE])
            .arg("-m")
            .arg(&self.model)
            .arg("-f")
            .arg(staged_wav)
            .args(["-otxt", "true", "--print-colors"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TranscribeError::Launch {
                command: self.executable.display().to_string(),
                source: e,
            })?;

        let (tx, rx) = crossbeam_channel::unbounded();
        if let Some(stdout) = child.stdout.take() {
            pump_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            pump_lines(stderr, tx.clone());
        }
        // The readers hold the remaining senders; the channel disconnects
        // once both streams hit EOF.
        drop(tx);

        loop {
            if cancel.load(Ordering::Relaxed) {
                kill_and_reap(&mut child);
                return Err(TranscribeError::Cancelled);
            }
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(line)) => on_line(&line),
                Ok(Err(e)) => {
                    kill_and_reap(&mut child);
                    return Err(TranscribeError::Stream(e));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let status = child.wait().map_err(TranscribeError::Stream)?;
        Ok(TranscriberExit {
            code: status.code(),
        })
    }
}

fn pump_lines(stream: impl Read + Send + 'static, tx: Sender<std::io::Result<String>>) {
    thread::spawn(move || {
        for line in BufReader::new(stream).lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn fake_transcriber(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-transcriber");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_missing_executable_is_launch_error() {
        let tmp = TempDir::new().unwrap();
        let transcriber = WhisperProcessTranscriber::new()
            .with_executable(tmp.path().join("no-such-transcriber"));
        let result = transcriber.transcribe(
            Path::new("song.wav"),
            &mut |_| {},
            &AtomicBool::new(false),
        );
        assert!(matches!(result, Err(TranscribeError::Launch { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_lines_delivered_in_emission_order() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_transcriber(tmp.path(), "echo a\necho b\necho c");
        let transcriber = WhisperProcessTranscriber::new().with_executable(tool);

        let mut lines = Vec::new();
        let exit = transcriber
            .transcribe(
                Path::new("song.wav"),
                &mut |line| lines.push(line.to_string()),
                &AtomicBool::new(false),
            )
            .unwrap();

        assert_eq!(lines, ["a", "b", "c"]);
        assert!(exit.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_stderr_lines_are_delivered_too() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_transcriber(tmp.path(), "echo progress >&2\necho text");
        let transcriber = WhisperProcessTranscriber::new().with_executable(tool);

        let mut lines = Vec::new();
        transcriber
            .transcribe(
                Path::new("song.wav"),
                &mut |line| lines.push(line.to_string()),
                &AtomicBool::new(false),
            )
            .unwrap();

        assert!(lines.contains(&"progress".to_string()));
        assert!(lines.contains(&"text".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_reported_not_interpreted() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_transcriber(tmp.path(), "exit 3");
        let transcriber = WhisperProcessTranscriber::new().with_executable(tool);

        let exit = transcriber
            .transcribe(Path::new("song.wav"), &mut |_| {}, &AtomicBool::new(false))
            .unwrap();

        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_kills_transcriber() {
        let tmp = TempDir::new().unwrap();
        let tool = fake_transcriber(tmp.path(), "sleep 5");
        let transcriber = WhisperProcessTranscriber::new().with_executable(tool);

        let start = std::time::Instant::now();
        let result = transcriber.transcribe(
            Path::new("song.wav"),
            &mut |_| {},
            &AtomicBool::new(true),
        );

        assert!(matches!(result, Err(TranscribeError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
