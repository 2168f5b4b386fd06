pub mod transcriber;
pub mod transcript_loader;
