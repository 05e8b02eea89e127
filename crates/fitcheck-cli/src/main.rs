use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fitcheck_cli::output::OutputFormat;
use fitcheck_cli::terminal::ColorPalette;
use fitcheck_lib::FitcheckConfig;

mod commands;

use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "EFT fitting skill requirements and doctrine readiness")]
struct Cli {
    /// Directory holding types.csv and type_attributes.csv.
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    /// Maximum prerequisite chain depth before resolution fails (at least 1).
    #[arg(
        long,
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_depth: Option<usize>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an EFT fitting and print its slot assignments.
    Parse {
        /// EFT fitting file.
        file: PathBuf,
    },
    /// List the skills needed to fly a fitting.
    Skills {
        /// EFT fitting file.
        file: PathBuf,
        /// Only list the skills needed for the hull.
        #[arg(long)]
        ship_only: bool,
    },
    /// Show every pilot's trained levels against a fitting's skills.
    Sheet {
        /// EFT fitting file.
        file: PathBuf,
        /// JSON array of pilots with their trained skills.
        #[arg(long)]
        pilots: PathBuf,
    },
    /// Build the readiness matrix of pilots against a set of fittings.
    Report {
        /// JSON array of pilots with their trained skills.
        #[arg(long)]
        pilots: PathBuf,
        /// Doctrine name used in log output.
        #[arg(long, default_value = "doctrine")]
        name: String,
        /// EFT fitting files, one per doctrine fit.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = FitcheckConfig::from_env();
    if let Some(dir) = cli.catalog_dir {
        config = config.with_catalog_dir(dir);
    }
    if let Some(depth) = cli.max_depth {
        config = config.with_max_prerequisite_depth(depth);
    }

    let context = CommandContext {
        config,
        format: cli.format,
        palette: ColorPalette::detect(),
    };

    match cli.command {
        Command::Parse { file } => commands::parse::handle_parse(&context, &file),
        Command::Skills { file, ship_only } => {
            commands::skills::handle_skills(&context, &file, ship_only)
        }
        Command::Sheet { file, pilots } => commands::sheet::handle_sheet(&context, &file, &pilots),
        Command::Report {
            pilots,
            name,
            files,
        } => commands::report::handle_report(&context, &name, &pilots, &files),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
