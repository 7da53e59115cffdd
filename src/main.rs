use anyhow::{Context, Result};
use bpm_analyzer::{estimate_file, Estimate, EstimatorConfig};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "bpm-analyzer")]
#[command(about = "Estimate the tempo of an audio file", long_about = None)]
struct Args {
    /// Audio file to analyze
    filename: String,

    /// Use the single-pass median estimator instead of multi-pass voting
    #[arg(long)]
    median: bool,

    /// Run the analysis passes in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            // Wrong arguments: clap's message already ends with the usage line
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(&args) {
        Ok(estimate) => {
            println!("{}", estimate.display_line());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("{:#}", e);
            eprintln!("Could not estimate BPM.");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Estimate> {
    // Expand ~ in path
    let path = PathBuf::from(shellexpand::tilde(&args.filename).as_ref());

    let config = if args.median {
        EstimatorConfig::median()
    } else {
        EstimatorConfig::weighted()
    }
    .with_parallel(args.parallel);

    let estimate =
        estimate_file(&path, config).with_context(|| format!("Analysis failed for {:?}", path))?;

    for pass in &estimate.passes {
        log::debug!(
            "  {}/{} @ {} Hz -> {:?}",
            pass.config.window_size,
            pass.config.hop_size,
            pass.config.sample_rate,
            pass.result
        );
    }

    Ok(estimate)
}
