pub mod run_state;
pub mod transcribe_media_use_case;
