use std::path::PathBuf;

use blockhead_runtime::config::RuntimeConfig;
use blockhead_runtime::replay;
use blockhead_runtime::transcript::Transcript;
use clap::Parser;
use log::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about = "Replay a BlockHead transcript and print its answer", long_about = None)]
struct Args {
    /// Transcript JSON file
    transcript: PathBuf,

    /// TOML file whose [board] table replaces the transcript's constants
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Replay twice and fail if the fingerprints differ
    #[arg(long = "verify")]
    verify: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
    let args = Args::parse();

    let mut transcript = Transcript::load(&args.transcript)?;
    if let Some(path) = &args.config {
        let config = RuntimeConfig::load(path)?;
        if config.board != transcript.constants {
            warn!(
                "config {} overrides transcript constants {:?} -> {:?}",
                path.display(),
                transcript.constants,
                config.board
            );
        }
        transcript.constants = config.board;
    }

    if args.verify {
        replay::verify_determinism(&transcript)?;
    }
    let (board, hash) = replay::rebuild_board(&transcript)?;
    let answer = board.as_ref().and_then(|b| b.calc_answer());

    println!("answer: {}", answer.as_deref().unwrap_or("(incomplete)"));
    println!("fingerprint: {}", hash);
    info!("replayed {} commands", transcript.commands.len());

    if let Some(expected) = &transcript.expected_answer {
        if answer.as_ref() != Some(expected) {
            error!(
                "expected answer {}, replay gave {}",
                expected,
                answer.as_deref().unwrap_or("(incomplete)")
            );
            std::process::exit(1);
        }
    }
    Ok(())
}
