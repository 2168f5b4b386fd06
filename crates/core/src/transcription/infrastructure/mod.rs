pub mod whisper_process_transcriber;
