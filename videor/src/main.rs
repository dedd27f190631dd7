//! videor: command-line entry point.
//!
//! ```text
//! videor -e -i <file>  -o <video>     Encode a file (".avi" appended if missing)
//! videor -d -i <video> -o <file>      Decode a video back into the file
//! videor --gen-config                 Write default config to stdout
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use videor::{Session, Summary, VideorConfig, VideorError};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "videor", about = "Encode any file as a playable video and decode it back")]
struct Cli {
    /// Encode the input file into a video.
    #[arg(short, long, conflicts_with = "decode", required_unless_present_any = ["decode", "gen_config"])]
    encode: bool,

    /// Decode the input video back into a file.
    #[arg(short, long, required_unless_present_any = ["encode", "gen_config"])]
    decode: bool,

    /// Input file for the operation.
    #[arg(short, long, required_unless_present = "gen_config")]
    input: Option<PathBuf>,

    /// Output file name.
    #[arg(short, long, required_unless_present = "gen_config")]
    output: Option<PathBuf>,

    /// Width and height of the video frames (overrides config; default 500).
    #[arg(short = 'l', long = "length")]
    length: Option<u32>,

    /// Frame worker threads, 0 = one per CPU (overrides config).
    #[arg(short, long)]
    workers: Option<usize>,

    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "videor.toml")]
    config: PathBuf,

    /// Print a JSON summary of the session to stdout.
    #[arg(long)]
    json: bool,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        return match VideorConfig::default_toml() {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("cannot render default config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let (Some(input), Some(output)) = (cli.input.clone(), cli.output.clone()) else {
        eprintln!("Invalid arguments");
        return ExitCode::FAILURE;
    };

    // Config warnings go to a temporary stderr subscriber; flags override
    // the file.
    let early = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .finish();
    let mut config = tracing::subscriber::with_default(early, || VideorConfig::load(&cli.config));
    if let Some(side) = cli.length {
        config.codec.side_length = side;
    }
    if let Some(workers) = cli.workers {
        config.codec.workers = workers;
    }

    // Init tracing.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.logging.level))
        .init();

    info!("videor v{}", env!("CARGO_PKG_VERSION"));

    let result = tokio::select! {
        result = run(cli.encode, config, input, output) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, aborting");
            Err(VideorError::Interrupted)
        }
    };

    match result {
        Ok(summary) => {
            if cli.json {
                match serde_json::to_string_pretty(&summary) {
                    Ok(text) => println!("{text}"),
                    Err(e) => warn!("cannot render summary: {e}"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(VideorError::InputNotFound(path)) => {
            warn!("file {} is not found. Exiting...", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            if e.exit_code() == 3 {
                error!("the video was not encoded by videor or is corrupt");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// `RUST_LOG` if set, otherwise `default`.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

async fn run(
    encode: bool,
    config: VideorConfig,
    input: PathBuf,
    output: PathBuf,
) -> Result<Summary, VideorError> {
    let session = Session::new(config)?;
    info!(
        resolution = %session.pipeline().resolution(),
        workers = session.pipeline().workers(),
        "session ready"
    );

    if encode {
        session.encode(&input, &output).await
    } else {
        session.decode(&input, &output).await
    }
}
