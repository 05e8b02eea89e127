//! Sheet command handler.

use std::path::Path;

use anyhow::{Context, Result};

use fitcheck_cli::output::format_sheet_text;
use fitcheck_lib::build_skill_sheet;

use super::skills::resolve_file;
use super::{load_pilots, CommandContext};

/// Handle the sheet subcommand.
pub fn handle_sheet(context: &CommandContext, file: &Path, pilots: &Path) -> Result<()> {
    let catalog = context.load_catalog()?;
    let pilots = load_pilots(pilots)?;
    let skills = resolve_file(context, &catalog, file)?;

    let sheet = build_skill_sheet(&skills.fit_skills, &pilots, &catalog)
        .context("failed to build skill sheet")?;
    context.emit(&sheet, || format_sheet_text(&sheet, &context.palette))
}
