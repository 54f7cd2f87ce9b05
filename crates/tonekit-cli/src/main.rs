//! tonekit - HDR tonemapping and LDR layer compositing CLI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "tonekit")]
#[command(author, version, about = "HDR tonemapping and LDR layer compositing")]
#[command(long_about = "
Tonemaps Radiance HDR images to 8-bit PNG and flattens stacks of PNG layers
with the Porter-Duff over operator.

Examples:
  tonekit tonemap scene.hdr -o scene.png              # Gamma 2.2 output
  tonekit tonemap scene.hdr -o scene.png -e -1 --filmic
  tonekit tonemap scene.hdr -o linear.png --no-srgb
  tonekit compose bg.png mid.png fg.png -o flat.png   # Bottom to top
  tonekit compose a.png b.png -o out.png --premultiplied
  tonekit -vv --log-file run.log tonemap scene.hdr -o scene.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tonemap an HDR image to 8-bit
    #[command(visible_alias = "tm")]
    Tonemap(TonemapArgs),

    /// Composite layers bottom to top with "over"
    #[command(visible_alias = "comp")]
    Compose(ComposeArgs),
}

#[derive(Args)]
struct TonemapArgs {
    /// Input HDR image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Exposure in stops
    #[arg(short, long, default_value = "0.0", allow_negative_numbers = true)]
    exposure: f32,

    /// Apply the filmic curve
    #[arg(long)]
    filmic: bool,

    /// Write linear values instead of gamma 2.2
    #[arg(long)]
    no_srgb: bool,
}

#[derive(Args)]
struct ComposeArgs {
    /// Input layers, bottom first
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Layers already carry premultiplied color
    #[arg(long)]
    premultiplied: bool,

    /// Blend the stored values directly instead of linearizing gamma 2.2
    #[arg(long)]
    no_srgb: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let codec = tonekit_io::init();

    match cli.command {
        Commands::Tonemap(args) => commands::tonemap::run(args, codec),
        Commands::Compose(args) => commands::compose::run(args, codec),
    }
}

/// Installs the stderr logger, plus a file logger when asked.
///
/// `RUST_LOG` takes precedence over `-v`. The returned guard flushes the
/// file logger on drop and must outlive all logging.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_tonemap() {
        let cli = Cli::try_parse_from([
            "tonekit", "-vv", "tonemap", "in.hdr", "-o", "out.png", "-e", "-1.5", "--filmic",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Tonemap(args) => {
                assert_eq!(args.input, PathBuf::from("in.hdr"));
                assert_eq!(args.output, PathBuf::from("out.png"));
                assert_eq!(args.exposure, -1.5);
                assert!(args.filmic);
                assert!(!args.no_srgb);
            }
            Commands::Compose(_) => panic!("expected tonemap"),
        }
    }

    #[test]
    fn parses_compose_in_order() {
        let cli = Cli::try_parse_from([
            "tonekit", "compose", "a.png", "b.png", "c.png", "-o", "out.png", "--no-srgb", "-j", "2",
        ])
        .unwrap();
        assert_eq!(cli.threads, 2);
        match cli.command {
            Commands::Compose(args) => {
                let names: Vec<_> = args.inputs.iter().map(|p| p.to_str().unwrap()).collect();
                assert_eq!(names, ["a.png", "b.png", "c.png"]);
                assert!(args.no_srgb);
                assert!(!args.premultiplied);
            }
            Commands::Tonemap(_) => panic!("expected compose"),
        }
    }

    #[test]
    fn compose_needs_a_layer() {
        assert!(Cli::try_parse_from(["tonekit", "compose", "-o", "out.png"]).is_err());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}
