//! Staging, audio conversion, and external-transcriber orchestration for
//! the hansa transcription front end.

pub mod audio;
pub mod pipeline;
pub mod shared;
pub mod staging;
pub mod transcription;
