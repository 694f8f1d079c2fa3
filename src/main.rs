use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use nebula::options::Options;
use nebula::scene::{SceneKind, SeedMode};
use nebula::Viewer;

/// Procedural galaxy and particle-field viewer.
#[derive(Parser, Debug)]
#[command(name = "nebula", version, about)]
struct Cli {
    /// Scene to show at startup: `galaxy` or `particles`.
    #[arg(long)]
    scene: Option<SceneKind>,

    /// TOML options file (see `assets/presets/`).
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Fixed seed; the same seed and parameters give the same cloud.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the options JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
}

fn print_schema() -> Result<(), String> {
    let schema = serde_json::to_string_pretty(&Options::json_schema())
        .map_err(|e| e.to_string())?;
    writeln!(std::io::stdout().lock(), "{schema}").map_err(|e| e.to_string())
}

fn resolve_options(cli: &Cli) -> Result<Options, nebula::NebulaError> {
    let mut options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(scene) = cli.scene {
        options.scene = scene;
    }
    if let Some(seed) = cli.seed {
        options.seed = SeedMode::Fixed(seed);
    }
    options.galaxy.validate()?;
    Ok(options)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.print_schema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let options = match resolve_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match Viewer::builder().with_options(options).build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
