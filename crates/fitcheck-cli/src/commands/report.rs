//! Report command handler: doctrine readiness across a set of fittings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use fitcheck_cli::output::format_report_text;
use fitcheck_lib::{run_doctrine_report, Doctrine, FittingRecord};

use super::{load_pilots, read_fitting, CommandContext};

/// Handle the report subcommand.
///
/// Fittings are numbered from 1 in the order given on the command line.
pub fn handle_report(
    context: &CommandContext,
    name: &str,
    pilots: &Path,
    files: &[PathBuf],
) -> Result<()> {
    let catalog = context.load_catalog()?;
    let pilots = load_pilots(pilots)?;

    let mut doctrine = Doctrine {
        name: name.to_string(),
        fittings: Vec::with_capacity(files.len()),
    };
    for (index, file) in files.iter().enumerate() {
        let text = read_fitting(file)?;
        let record = FittingRecord::from_eft(index as i64 + 1, text)
            .with_context(|| format!("failed to read fitting header in {}", file.display()))?;
        doctrine.fittings.push(record);
    }

    let report = run_doctrine_report(&doctrine, &pilots, &catalog, &context.config)
        .with_context(|| format!("failed to build readiness report for {name}"))?;
    context.emit(&report, || format_report_text(&report, &context.palette))
}
