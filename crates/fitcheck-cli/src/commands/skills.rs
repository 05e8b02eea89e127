//! Skills command handler: the transitive skill list for one fitting.

use std::path::Path;

use anyhow::{Context, Result};

use fitcheck_cli::output::format_skill_listing_text;
use fitcheck_lib::{skill_listing, FitSkills, FittingParser, SkillResolver, StaticCatalog};

use super::{read_fitting, CommandContext};

/// Handle the skills subcommand.
pub fn handle_skills(context: &CommandContext, file: &Path, ship_only: bool) -> Result<()> {
    let catalog = context.load_catalog()?;
    let skills = resolve_file(context, &catalog, file)?;
    let required = if ship_only {
        &skills.ship_skills
    } else {
        &skills.fit_skills
    };

    let listing = skill_listing(required, &catalog).context("failed to name required skills")?;
    context.emit(&listing, || format_skill_listing_text(&listing))
}

/// Parse `file` and resolve its ship and full-fit skill sets.
pub fn resolve_file(
    context: &CommandContext,
    catalog: &StaticCatalog,
    file: &Path,
) -> Result<FitSkills> {
    let text = read_fitting(file)?;
    let parsed = FittingParser::new(catalog)
        .with_hull_rules(context.config.hull_rules())
        .parse(&text)
        .with_context(|| format!("failed to parse fitting {}", file.display()))?;
    SkillResolver::new(catalog)
        .with_max_depth(context.config.max_prerequisite_depth)
        .resolve_fitting(&parsed)
        .with_context(|| format!("failed to resolve skills for {}", file.display()))
}
