mod worker;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use hansa_core::pipeline::run_state::RunPhase;
use hansa_core::staging::staging_area::StagingArea;

use worker::{TranscribeParams, WorkerMessage};

/// Transcribe media files: stage a normalized WAV via ffmpeg, run the
/// external speech-to-text engine over it, and print the transcript.
#[derive(Parser)]
#[command(name = "hansa")]
struct Cli {
    /// Input media files to transcribe, processed one at a time.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let staging = StagingArea::in_working_dir();
    // Held for the whole process: staged audio and transcripts are removed
    // at exit whether runs succeeded or failed.
    let _staging_guard = staging.cleanup_guard();

    for input in &cli.inputs {
        transcribe_one(input.clone(), staging.clone())?;
    }

    Ok(())
}

fn transcribe_one(
    input: PathBuf,
    staging: StagingArea,
) -> Result<(), Box<dyn std::error::Error>> {
    let (rx, _cancel) = worker::spawn(TranscribeParams {
        input_path: input.clone(),
        staging,
    });

    for message in rx.iter() {
        match message {
            WorkerMessage::Phase(RunPhase::Converting) => {
                eprintln!("Converting {} ...", input.display());
            }
            WorkerMessage::Phase(RunPhase::Transcribing) => {
                eprintln!("Transcribing ...");
            }
            WorkerMessage::Phase(_) => {}
            WorkerMessage::Line(line) => println!("{line}"),
            WorkerMessage::Finished(outcome) => match outcome.transcript {
                Some(text) => {
                    log::info!("transcript loaded for {}", outcome.staged_wav.display());
                    println!();
                    println!("{text}");
                }
                None => eprintln!("No transcript was produced for {}", input.display()),
            },
            WorkerMessage::Error(e) => return Err(e.into()),
            WorkerMessage::Cancelled => eprintln!("Cancelled"),
        }
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    }
    Ok(())
}
