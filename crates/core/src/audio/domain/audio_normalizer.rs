use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o error while running {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
    /// The conversion tool reported failure; `diagnostics` carries its
    /// captured stdout and stderr verbatim.
    #[error("conversion of {input} failed:\n{diagnostics}")]
    Conversion { input: PathBuf, diagnostics: String },
    #[error("conversion cancelled")]
    Cancelled,
}

/// Domain interface for converting arbitrary media into staged WAV audio.
///
/// Implementations produce mono 16-bit signed PCM at 16 kHz, the input
/// format the external transcriber expects. No format whitelist is applied
/// up front; an undecodable input fails at conversion time.
pub trait AudioNormalizer: Send {
    /// Convert `input` into a WAV file at `staged_wav`, blocking until the
    /// conversion finishes or `cancel` is set. A failed conversion must not
    /// leave a partial file at `staged_wav`.
    fn normalize(
        &self,
        input: &Path,
        staged_wav: &Path,
        cancel: &AtomicBool,
    ) -> Result<(), NormalizeError>;
}
