/// Hidden working directory for staged audio and transcripts, relative to
/// the process working directory. Created lazily, removed at process exit.
pub const STAGING_DIR_NAME: &str = ".hansa";

/// Suffix the external transcriber appends to the staged WAV's file name
/// when writing the plain-text transcript (`song.wav` -> `song.wav.txt`).
pub const TRANSCRIPT_SUFFIX: &str = ".txt";

pub const FFMPEG_COMMAND: &str = "ffmpeg";

/// Staged audio format the transcriber expects: mono 16-bit signed PCM.
pub const STAGED_CODEC: &str = "pcm_s16le";
pub const STAGED_CHANNELS: u32 = 1;
pub const STAGED_SAMPLE_RATE: u32 = 16_000;

/// The transcriber executable and its model are environment prerequisites,
/// expected at these fixed locations.
pub const TRANSCRIBER_COMMAND: &str = "./main_exec";
pub const TRANSCRIBER_MODEL_PATH: &str = "models/german_q4_0.bin";

pub const TRANSCRIBER_THREADS: u32 = 8;
pub const TRANSCRIBER_SPEED: u32 = 4;
pub const TRANSCRIBER_LANGUAGE: &str = "de";
