use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use zpaceway_engines::registry;
use zpaceway_shell::config::Config;

mod audio;
mod emulator;
mod input;
mod labels;
mod video;

/// Handheld emulator shell.
#[derive(Parser, Debug)]
#[command(name = "zpaceway", version, about)]
struct Args {
    /// ROM image (or .zip) to start immediately
    rom: Option<PathBuf>,

    /// Emulation engine to run sessions on
    #[arg(long)]
    engine: Option<String>,

    /// Window size as a multiple of the handheld design size
    #[arg(long)]
    scale: Option<u32>,

    /// Config file (defaults to <config dir>/zpaceway/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable audio output
    #[arg(long)]
    mute: bool,

    /// Print the available engines and exit
    #[arg(long)]
    list_engines: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_engines {
        for entry in registry::all() {
            println!("{:<12} {}", entry.name, entry.description);
        }
        return ExitCode::SUCCESS;
    }

    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if let Some(engine) = args.engine {
        config.engine.name = engine;
    }
    if let Some(scale) = args.scale {
        config.video.scale = scale.max(1);
    }

    tracing::info!(engine = %config.engine.name, "Starting Zpaceway");

    match emulator::run(&config, args.rom, args.mute) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "frontend error");
            ExitCode::FAILURE
        }
    }
}
