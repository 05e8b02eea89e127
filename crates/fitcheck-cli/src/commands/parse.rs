//! Parse command handler.

use std::path::Path;

use anyhow::{Context, Result};

use fitcheck_cli::output::format_fitting_text;
use fitcheck_lib::FittingParser;

use super::{read_fitting, CommandContext};

/// Handle the parse subcommand.
pub fn handle_parse(context: &CommandContext, file: &Path) -> Result<()> {
    let catalog = context.load_catalog()?;
    let text = read_fitting(file)?;
    let parsed = FittingParser::new(&catalog)
        .with_hull_rules(context.config.hull_rules())
        .parse(&text)
        .with_context(|| format!("failed to parse fitting {}", file.display()))?;

    context.emit(&parsed, || format_fitting_text(&parsed))
}
